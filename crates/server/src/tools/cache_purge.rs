//! cache_purge tool implementation.
//!
//! Sweeps expired lookup results, or clears the whole cache.

use docscout_core::{DiskCache, Error};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Remove every entry instead of only expired ones.
    #[serde(default)]
    pub all: bool,
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of expired entries deleted; absent when the cache was cleared.
    pub deleted: Option<usize>,

    /// Whether the whole cache was cleared.
    pub cleared: bool,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(cache: &DiskCache, params: CachePurgeParams) -> Result<CallToolResult, McpError> {
    let output = if params.all {
        cache.clear().await;
        tracing::info!(root = %cache.root().display(), "cache cleared");
        CachePurgeOutput { deleted: None, cleared: true }
    } else {
        let deleted = cache.purge_expired().await;
        tracing::info!(deleted, "expired cache entries purged");
        CachePurgeOutput { deleted: Some(deleted), cleared: false }
    };

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
