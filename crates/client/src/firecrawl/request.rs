//! Firecrawl crawl request types and validation.

use docscout_core::lookup::MAX_PAGE_LIMIT;
use serde::Serialize;

/// Body of `POST /v1/crawl`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlRequest {
    /// Root URL to start crawling from.
    pub url: String,

    /// Maximum number of pages to crawl (1-50).
    pub limit: u32,

    /// Per-page scrape settings.
    pub scrape_options: ScrapeOptions,
}

/// Formats requested for each crawled page.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeOptions {
    pub formats: Vec<String>,
}

impl CrawlRequest {
    /// Crawl `url` for up to `limit` pages, scraping Markdown.
    ///
    /// Markdown is requested so titles can be recovered from headings.
    pub fn markdown(url: &str, limit: u32) -> Self {
        Self {
            url: url.trim().to_string(),
            limit,
            scrape_options: ScrapeOptions { formats: vec!["markdown".to_string()] },
        }
    }

    /// Validate the request parameters.
    pub fn validate(&self) -> Result<(), crate::firecrawl::FirecrawlError> {
        use crate::firecrawl::FirecrawlError;

        if self.url.is_empty() {
            return Err(FirecrawlError::InvalidRequest("url cannot be empty".to_string()));
        }

        match url::Url::parse(&self.url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            Ok(parsed) => {
                return Err(FirecrawlError::InvalidRequest(format!("unsupported scheme: {}", parsed.scheme())));
            }
            Err(e) => return Err(FirecrawlError::InvalidRequest(format!("invalid url: {e}"))),
        }

        if !(1..=MAX_PAGE_LIMIT).contains(&self.limit) {
            return Err(FirecrawlError::InvalidRequest(format!("limit must be 1-{MAX_PAGE_LIMIT}")));
        }

        Ok(())
    }
}
