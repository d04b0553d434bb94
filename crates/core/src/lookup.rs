//! Fetch-or-discover, then filter, then report.
//!
//! Only discovery is cached, keyed by normalized root URL and page limit.
//! Filtering depends on the query and runs on every lookup, so the cache
//! grows by at most one entry per (root, limit) pair.

use crate::cache::DiskCache;
use crate::normalize::normalize_url;
use crate::provider::{PageDiscovery, PageFilter};
use crate::{Error, PageMetadata};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default number of pages to discover.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Upper bound on pages to discover per lookup.
pub const MAX_PAGE_LIMIT: u32 = 50;

/// Cache key for the discovery result of `root_url` at `limit`.
///
/// The normalized URL goes last so the cache can recover its host for
/// partitioning.
pub fn discovery_cache_key(root_url: &str, limit: u32) -> String {
    format!("discovered_pages:limit={limit}:{}", normalize_url(root_url))
}

/// Where the page list of a lookup came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSource {
    Cache,
    LiveDiscovery,
}

impl fmt::Display for PageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSource::Cache => f.write_str("cache (discovered URLs)"),
            PageSource::LiveDiscovery => f.write_str("live discovery (discovered URLs)"),
        }
    }
}

/// A validated lookup request.
#[derive(Debug, Clone)]
pub struct LookupRequest {
    pub root_url: String,
    pub query: String,
    pub limit: u32,
}

/// Terminal outcome of a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupReport {
    /// True for discovery or filtering failures.
    pub is_error: bool,
    /// Human-readable summary.
    pub message: String,
    /// Relevant URLs, in the order the filter returned them.
    pub urls: Vec<String>,
    /// Origin of the page list, once one was obtained.
    pub source: Option<PageSource>,
}

impl LookupReport {
    fn error(message: String, source: Option<PageSource>) -> Self {
        Self { is_error: true, message, urls: Vec::new(), source }
    }

    fn ok(message: String, urls: Vec<String>, source: Option<PageSource>) -> Self {
        Self { is_error: false, message, urls, source }
    }
}

/// Composes the cache with the discovery and filtering collaborators.
///
/// Collaborators are injected so each caller (and each test) decides what
/// backs them.
#[derive(Clone)]
pub struct LookupService {
    cache: DiskCache,
    discovery: Arc<dyn PageDiscovery>,
    filter: Arc<dyn PageFilter>,
    deadline: Duration,
}

impl LookupService {
    pub fn new(
        cache: DiskCache, discovery: Arc<dyn PageDiscovery>, filter: Arc<dyn PageFilter>, deadline: Duration,
    ) -> Self {
        Self { cache, discovery, filter, deadline }
    }

    pub fn cache(&self) -> &DiskCache {
        &self.cache
    }

    /// Run one lookup to completion.
    ///
    /// Never fails: every outcome, including collaborator errors, is a report.
    pub async fn find_relevant_pages(&self, req: &LookupRequest) -> LookupReport {
        let root = req.root_url.as_str();
        let query = req.query.as_str();
        let key = discovery_cache_key(root, req.limit);

        let (pages, source) = match self.cached_pages(&key).await {
            Some(pages) => (pages, PageSource::Cache),
            None => match self.bounded("discovery", self.discovery.discover(root, req.limit)).await {
                Ok(pages) => {
                    if pages.is_empty() {
                        tracing::warn!(root_url = root, "url discovery returned no pages");
                    } else {
                        match serde_json::to_string(&pages) {
                            Ok(json) => self.cache.set(&key, &json).await,
                            Err(e) => tracing::warn!(key, error = %e, "failed to serialize discovered pages"),
                        }
                    }
                    (pages, PageSource::LiveDiscovery)
                }
                Err(e) => {
                    tracing::warn!(root_url = root, error = %e, "url discovery failed");
                    return LookupReport::error(format!("Failed to discover pages from {root}: {e}"), None);
                }
            },
        };

        if pages.is_empty() {
            return LookupReport::ok(format!("No pages found for {root} to filter."), Vec::new(), Some(source));
        }

        tracing::debug!(root_url = root, pages = pages.len(), %source, "filtering discovered pages");

        let urls = match self.bounded("filtering", self.filter.filter(&pages, query)).await {
            Ok(urls) => urls,
            Err(e) => {
                tracing::warn!(root_url = root, query, error = %e, "llm failed to filter relevant pages");
                return LookupReport::error(
                    format!("LLM processing failed for URL filtering on query: '{query}' for {root}"),
                    Some(source),
                );
            }
        };

        let message = if urls.is_empty() {
            format!("No specific pages found to be relevant for query '{query}' under {root} (Source: {source}).")
        } else {
            format!("Found {} relevant page(s) for query '{query}' under {root} (Source: {source}):", urls.len())
        };

        LookupReport::ok(message, urls, Some(source))
    }

    async fn cached_pages(&self, key: &str) -> Option<Vec<PageMetadata>> {
        let json = self.cache.get(key).await?;
        match serde_json::from_str(&json) {
            Ok(pages) => Some(pages),
            Err(e) => {
                tracing::warn!(key, error = %e, "cached page list is malformed, rediscovering");
                None
            }
        }
    }

    async fn bounded<T>(&self, stage: &str, call: impl Future<Output = Result<T, Error>>) -> Result<T, Error> {
        tokio::time::timeout(self.deadline, call)
            .await
            .map_err(|_| Error::Timeout(format!("{stage} exceeded {}ms", self.deadline.as_millis())))?
    }
}
