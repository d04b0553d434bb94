//! Canned collaborators shared by the tool tests.

use async_trait::async_trait;
use docscout_core::{DiskCache, Error, LookupService, PageDiscovery, PageFilter, PageMetadata};
use rmcp::model::CallToolResult;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Discovery returning a fixed page list and counting calls.
#[derive(Clone, Default)]
pub struct StaticDiscovery {
    pages: Vec<PageMetadata>,
    calls: Arc<AtomicUsize>,
}

impl StaticDiscovery {
    pub fn pages(urls: &[&str]) -> Self {
        Self { pages: urls.iter().map(|u| PageMetadata::new(*u, None)).collect(), calls: Arc::default() }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageDiscovery for StaticDiscovery {
    async fn discover(&self, _root_url: &str, limit: u32) -> Result<Vec<PageMetadata>, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.pages.iter().take(limit as usize).cloned().collect())
    }
}

/// Filter returning a fixed URL list.
#[derive(Clone, Default)]
pub struct StaticFilter {
    urls: Vec<String>,
}

impl StaticFilter {
    pub fn urls(urls: &[&str]) -> Self {
        Self { urls: urls.iter().map(|u| u.to_string()).collect() }
    }
}

#[async_trait]
impl PageFilter for StaticFilter {
    async fn filter(&self, _pages: &[PageMetadata], _query: &str) -> Result<Vec<String>, Error> {
        Ok(self.urls.clone())
    }
}

pub fn service_with(root: &Path, discovery: StaticDiscovery, filter: StaticFilter) -> LookupService {
    LookupService::new(
        DiskCache::new(root, Duration::from_secs(60)),
        Arc::new(discovery),
        Arc::new(filter),
        Duration::from_secs(5),
    )
}

/// Text of every content item, in order.
pub fn content_texts(result: &CallToolResult) -> Vec<String> {
    result
        .content
        .iter()
        .map(|c| {
            let value = serde_json::to_value(c).unwrap();
            value.get("text").and_then(|v| v.as_str()).unwrap_or_default().to_string()
        })
        .collect()
}
