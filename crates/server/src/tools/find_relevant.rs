//! find_relevant_doc_pages tool implementation.
//!
//! Validates the arguments, runs one lookup and renders the report as text
//! content: the summary first, then one item per relevant URL.

use docscout_core::lookup::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use docscout_core::{Error, LookupReport, LookupRequest, LookupService};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for the find_relevant_doc_pages tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FindRelevantParams {
    /// Root URL of the documentation site (http or https).
    pub root_url: String,

    /// The question to find relevant pages for.
    pub query: String,

    /// Maximum number of pages to discover (1-50, default 20).
    #[serde(default = "default_max_pages")]
    pub max_pages_to_discover: i64,
}

fn default_max_pages() -> i64 {
    i64::from(DEFAULT_PAGE_LIMIT)
}

impl FindRelevantParams {
    /// Check the arguments and turn them into a lookup request.
    pub fn validate(&self) -> Result<LookupRequest, Error> {
        let root_url = self.root_url.trim();
        match url::Url::parse(root_url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => {}
            Ok(parsed) => {
                return Err(Error::InvalidUrl(format!("root_url must be http or https, got {}", parsed.scheme())));
            }
            Err(e) => return Err(Error::InvalidUrl(format!("root_url is not a valid URL: {e}"))),
        }

        let query = self.query.trim();
        if query.is_empty() {
            return Err(Error::InvalidInput("query cannot be empty".to_string()));
        }

        let limit = u32::try_from(self.max_pages_to_discover)
            .ok()
            .filter(|n| (1..=MAX_PAGE_LIMIT).contains(n))
            .ok_or_else(|| Error::InvalidInput(format!("max_pages_to_discover must be 1-{MAX_PAGE_LIMIT}")))?;

        Ok(LookupRequest { root_url: root_url.to_string(), query: query.to_string(), limit })
    }
}

/// Implementation of the find_relevant_doc_pages tool.
pub async fn find_relevant_impl(
    service: &LookupService, params: FindRelevantParams,
) -> Result<CallToolResult, McpError> {
    let req = match params.validate() {
        Ok(req) => req,
        Err(e) => {
            tracing::info!(error = %e, "rejected find_relevant_doc_pages arguments");
            return Ok(CallToolResult::error(vec![Content::text(format!("Invalid arguments: {e}"))]));
        }
    };

    tracing::info!(root_url = %req.root_url, limit = req.limit, "finding relevant doc pages");
    let report = service.find_relevant_pages(&req).await;

    Ok(render(report))
}

/// Render a lookup report as tool content.
pub fn render(report: LookupReport) -> CallToolResult {
    let mut content = Vec::with_capacity(report.urls.len() + 1);
    content.push(Content::text(report.message));
    content.extend(report.urls.into_iter().map(Content::text));

    if report.is_error { CallToolResult::error(content) } else { CallToolResult::success(content) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{StaticDiscovery, StaticFilter, content_texts, service_with};

    fn params(root_url: &str, query: &str, max: i64) -> FindRelevantParams {
        FindRelevantParams { root_url: root_url.into(), query: query.into(), max_pages_to_discover: max }
    }

    #[test]
    fn test_default_limit() {
        let params: FindRelevantParams =
            serde_json::from_str(r#"{ "root_url": "https://docs.example.com", "query": "install" }"#).unwrap();
        assert_eq!(params.max_pages_to_discover, 20);
        assert_eq!(params.validate().unwrap().limit, 20);
    }

    #[test]
    fn test_validation() {
        assert!(params("https://docs.example.com", "  q  ", 50).validate().is_ok());
        assert!(matches!(params("docs.example.com", "q", 5).validate(), Err(Error::InvalidUrl(_))));
        assert!(matches!(params("ftp://docs.example.com", "q", 5).validate(), Err(Error::InvalidUrl(_))));
        assert!(matches!(params("https://docs.example.com", "   ", 5).validate(), Err(Error::InvalidInput(_))));
        assert!(matches!(params("https://docs.example.com", "q", 0).validate(), Err(Error::InvalidInput(_))));
        assert!(matches!(params("https://docs.example.com", "q", 51).validate(), Err(Error::InvalidInput(_))));
        assert!(matches!(params("https://docs.example.com", "q", -3).validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_validation_trims() {
        let req = params("  https://docs.example.com  ", " how to install ", 5).validate().unwrap();
        assert_eq!(req.root_url, "https://docs.example.com");
        assert_eq!(req.query, "how to install");
    }

    #[tokio::test]
    async fn test_found_pages_render_one_item_per_url() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(
            dir.path(),
            StaticDiscovery::pages(&["https://docs.example.com/install", "https://docs.example.com/faq"]),
            StaticFilter::urls(&["https://docs.example.com/install"]),
        );

        let result = find_relevant_impl(&service, params("https://docs.example.com", "install", 5)).await.unwrap();

        assert_ne!(result.is_error, Some(true));
        let texts = content_texts(&result);
        assert_eq!(texts.len(), 2);
        assert!(texts[0].starts_with("Found 1 relevant page(s) for query 'install'"));
        assert_eq!(texts[1], "https://docs.example.com/install");
    }

    #[tokio::test]
    async fn test_invalid_arguments_skip_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let discovery = StaticDiscovery::pages(&["https://docs.example.com/install"]);
        let service = service_with(dir.path(), discovery.clone(), StaticFilter::urls(&[]));

        let result = find_relevant_impl(&service, params("https://docs.example.com", "", 5)).await.unwrap();

        assert_eq!(result.is_error, Some(true));
        assert!(content_texts(&result)[0].starts_with("Invalid arguments: INVALID_INPUT"));
        assert_eq!(discovery.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_discovery_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(dir.path(), StaticDiscovery::pages(&[]), StaticFilter::urls(&[]));

        let result = find_relevant_impl(&service, params("https://docs.example.com", "install", 5)).await.unwrap();

        assert_ne!(result.is_error, Some(true));
        assert_eq!(content_texts(&result), vec!["No pages found for https://docs.example.com to filter.".to_string()]);
    }
}
