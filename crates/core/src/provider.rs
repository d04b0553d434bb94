//! Seams to the external collaborators.
//!
//! Discovery and filtering are black boxes behind these traits so the
//! lookup can run against the real HTTP clients or against test fakes.

use crate::{Error, PageMetadata};
use async_trait::async_trait;

/// Enumerates candidate pages under a root URL.
#[async_trait]
pub trait PageDiscovery: Send + Sync {
    /// Discover up to `limit` pages under `root_url`.
    ///
    /// `Ok(vec![])` means the crawl succeeded but found nothing, which is
    /// distinct from `Err`.
    async fn discover(&self, root_url: &str, limit: u32) -> Result<Vec<PageMetadata>, Error>;
}

/// Selects the pages relevant to a query.
#[async_trait]
pub trait PageFilter: Send + Sync {
    /// Return the URLs among `pages` relevant to `query`.
    ///
    /// `Ok(vec![])` means nothing relevant; `Err` means the filter itself failed.
    async fn filter(&self, pages: &[PageMetadata], query: &str) -> Result<Vec<String>, Error>;
}
