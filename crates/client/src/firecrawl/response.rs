//! Firecrawl crawl response types and page normalization.

use docscout_core::PageMetadata;
use serde::{Deserialize, Deserializer};

/// Response to `POST /v1/crawl`.
#[derive(Debug, Deserialize)]
pub struct CrawlStarted {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response to `GET /v1/crawl/{id}` and to its `next` pages.
#[derive(Debug, Deserialize)]
pub struct CrawlStatus {
    /// `scraping`, `completed`, `failed` or `cancelled`.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub data: Vec<CrawlDocument>,
    /// URL of the next chunk of results, if the payload was split.
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Crawl job state as reported by Firecrawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Running,
    Completed,
    Failed,
}

impl CrawlStatus {
    pub fn state(&self) -> JobState {
        match self.status.as_str() {
            "completed" => JobState::Completed,
            "failed" | "cancelled" => JobState::Failed,
            _ => JobState::Running,
        }
    }
}

/// One crawled page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrawlDocument {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub markdown: Option<String>,
    #[serde(default)]
    pub metadata: Option<DocumentMetadata>,
}

/// Page metadata extracted by Firecrawl.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, rename = "sourceURL")]
    pub source_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Accept a string, an array of strings (first wins) or null.
///
/// Pages with duplicated meta tags come back as arrays.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<Lenient>::deserialize(deserializer)? {
        Some(Lenient::One(s)) => Some(s),
        Some(Lenient::Many(v)) => v.into_iter().next(),
        None => None,
    })
}

impl CrawlDocument {
    /// Page URL, preferring the document URL over metadata.
    pub fn page_url(&self) -> Option<&str> {
        let metadata = self.metadata.as_ref();
        self.url
            .as_deref()
            .or_else(|| metadata.and_then(|m| m.url.as_deref()))
            .or_else(|| metadata.and_then(|m| m.source_url.as_deref()))
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    /// Convert into page metadata, synthesizing a title when needed.
    ///
    /// Returns `None` for documents without any URL.
    pub fn into_page(self) -> Option<PageMetadata> {
        let url = self.page_url()?.to_string();

        let title = self
            .metadata
            .as_ref()
            .and_then(|m| m.title.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| synthesize_title(&url, self.markdown.as_deref()));

        Some(PageMetadata::new(url, Some(title)))
    }
}

/// Build a title from page content or, failing that, from the URL path.
///
/// 1. A leading `# ` heading in the Markdown
/// 2. The last path segment, with `-`/`_` as spaces, `.html`/`.md` dropped
///    and each word capitalized
/// 3. The URL itself, or `Untitled Page`
pub fn synthesize_title(url: &str, markdown: Option<&str>) -> String {
    if let Some(heading) = markdown.and_then(leading_heading) {
        return heading;
    }

    if let Some(title) = title_from_path(url) {
        return title;
    }

    if url.is_empty() { "Untitled Page".to_string() } else { url.to_string() }
}

fn leading_heading(markdown: &str) -> Option<String> {
    let first = markdown.trim().lines().next()?;
    let heading = first.strip_prefix("# ")?.trim();
    (!heading.is_empty()).then(|| heading.to_string())
}

fn title_from_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.rfind(|s| !s.is_empty())?;

    let lower = segment.to_ascii_lowercase();
    let stem = if lower.ends_with(".html") {
        &segment[..segment.len() - ".html".len()]
    } else if lower.ends_with(".md") {
        &segment[..segment.len() - ".md".len()]
    } else {
        segment
    };

    let title = stem
        .replace(['-', '_'], " ")
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    (!title.trim().is_empty()).then_some(title)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
