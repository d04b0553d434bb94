//! docscout server entry point.
//!
//! Boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use anyhow::Result;
use docscout_client::{FirecrawlClient, FirecrawlConfig, GeminiClient, GeminiConfig};
use docscout_core::{AppConfig, DiskCache, LookupService};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;

    let cache = DiskCache::open(&config.cache_dir, config.cache_ttl()).await;

    tracing::info!(
        cache_dir = %cache.root().display(),
        ttl_secs = cache.ttl().as_secs(),
        "Starting docscout server on stdio transport"
    );

    let purged = cache.purge_expired().await;
    if purged > 0 {
        tracing::info!(purged, "removed expired cache entries");
    }

    let discovery = FirecrawlClient::new(FirecrawlConfig::from(&config))?;
    let filter = GeminiClient::new(GeminiConfig::from(&config))?;
    let service = LookupService::new(cache, Arc::new(discovery), Arc::new(filter), config.lookup_timeout());

    let handler = handler::DocScoutServer::new(service);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
