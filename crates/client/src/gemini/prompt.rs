//! Relevance prompt and reply parsing.

use docscout_core::PageMetadata;

/// Reply meaning "no page is relevant".
pub const NONE_REPLY: &str = "NONE";

/// Build the relevance prompt for `pages` and `query`.
///
/// Pages are listed one per line as `N. URL: <url> (Title: <title>)`; the
/// title part is left out for untitled pages.
pub fn build_prompt(pages: &[PageMetadata], query: &str) -> String {
    let page_list = pages
        .iter()
        .enumerate()
        .map(|(i, page)| match page.title.as_deref().filter(|t| !t.is_empty()) {
            Some(title) => format!("{}. URL: {} (Title: {})", i + 1, page.url, title),
            None => format!("{}. URL: {}", i + 1, page.url),
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Given the following list of discovered web pages (with their URLs and titles) from a documentation site, \
and a user's question, please identify which of these pages are most relevant to answering the question.
Return *only* a comma-separated list of the relevant URLs. \
For example: \"https://url1.com/path,https://url2.com/another\"
If none of the pages seem relevant, return the exact phrase: \"{NONE_REPLY}\".
Do not add any other explanatory text or formatting.

Discovered Pages:
---
{page_list}
---

User's Question: {query}

Comma-separated list of relevant URLs (or {NONE_REPLY}):
"
    )
}

/// Parse the model reply into URLs.
///
/// `NONE` (any case) yields an empty list. Otherwise the reply is split on
/// commas with blanks dropped. URLs are returned as the model wrote them.
pub fn parse_relevant_urls(reply: &str) -> Vec<String> {
    let reply = reply.trim();
    if reply.eq_ignore_ascii_case(NONE_REPLY) {
        return Vec::new();
    }

    reply.split(',').map(str::trim).filter(|u| !u.is_empty()).map(str::to_string).collect()
}
