//! Firecrawl crawl API client.
//!
//! Implements page discovery on top of Firecrawl's asynchronous crawl jobs.
//!
//! ### Protocol
//!
//! - **Start**: `POST {base}/v1/crawl` with `{url, limit, scrapeOptions}`; returns a job id.
//! - **Poll**: `GET {base}/v1/crawl/{id}` until `status` is `completed`, `failed` or `cancelled`.
//! - **Paging**: a completed job may split its documents; `next` points at the following chunk.
//! - **Authentication**: `Authorization: Bearer <key>`.
//!
//! Polling has no cap of its own; callers bound the whole crawl with a deadline.

pub mod error;
pub mod request;
pub mod response;

pub use error::FirecrawlError;
pub use request::{CrawlRequest, ScrapeOptions};
pub use response::{CrawlDocument, CrawlStarted, CrawlStatus, DocumentMetadata, JobState, synthesize_title};

use async_trait::async_trait;
use docscout_core::{AppConfig, Error, PageDiscovery, PageMetadata};
use reqwest::header;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default base URL for the Firecrawl API.
const DEFAULT_BASE_URL: &str = "https://api.firecrawl.dev";

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "docscout/0.1";

/// Default delay between status polls.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Firecrawl client configuration.
#[derive(Debug, Clone)]
pub struct FirecrawlConfig {
    /// API key. An empty key is rejected when a crawl starts.
    pub api_key: String,
    /// Base URL (default: https://api.firecrawl.dev).
    pub base_url: String,
    /// Per-request timeout (default: 20s).
    pub timeout: Duration,
    /// User-agent string.
    pub user_agent: String,
    /// Delay between status polls (default: 2s).
    pub poll_interval: Duration,
}

impl Default for FirecrawlConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl From<&AppConfig> for FirecrawlConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_key: config.require_firecrawl_api_key().unwrap_or_default().to_string(),
            base_url: config.firecrawl_base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
            poll_interval: config.crawl_poll_interval(),
        }
    }
}

/// Firecrawl API client.
#[derive(Debug, Clone)]
pub struct FirecrawlClient {
    http: reqwest::Client,
    config: FirecrawlConfig,
}

impl FirecrawlClient {
    /// Create a new Firecrawl client.
    ///
    /// A missing API key is not an error here; crawls fail fast with
    /// [`FirecrawlError::MissingApiKey`] instead, so the server can start
    /// without every credential.
    pub fn new(config: FirecrawlConfig) -> Result<Self, FirecrawlError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| FirecrawlError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    /// Run a crawl job to completion and return every crawled document.
    pub async fn crawl(&self, req: &CrawlRequest) -> Result<Vec<CrawlDocument>, FirecrawlError> {
        if self.config.api_key.is_empty() {
            return Err(FirecrawlError::MissingApiKey);
        }
        req.validate()?;

        let start = Instant::now();
        tracing::debug!("starting Firecrawl crawl: url={} limit={}", req.url, req.limit);

        let response = self
            .http
            .post(format!("{}/v1/crawl", self.base_url()))
            .bearer_auth(&self.config.api_key)
            .header(header::ACCEPT, "application/json")
            .json(req)
            .send()
            .await?;
        let started: CrawlStarted = Self::read_json(response).await?;

        let id = match (started.success, started.id) {
            (true, Some(id)) => id,
            (_, _) => {
                return Err(FirecrawlError::JobFailed(
                    started.error.unwrap_or_else(|| "crawl was not started".to_string()),
                ));
            }
        };

        let status_url = format!("{}/v1/crawl/{}", self.base_url(), id);
        let mut status = self.poll(&status_url).await?;

        let mut documents = std::mem::take(&mut status.data);
        let mut next = status.next.take();
        while let Some(url) = next {
            if documents.len() >= req.limit as usize {
                break;
            }
            let chunk: CrawlStatus = self.get_json(&url).await?;
            documents.extend(chunk.data);
            next = chunk.next;
        }

        tracing::debug!("crawl {} completed in {:?}, {} documents", id, start.elapsed(), documents.len());

        Ok(documents)
    }

    async fn poll(&self, status_url: &str) -> Result<CrawlStatus, FirecrawlError> {
        loop {
            let status: CrawlStatus = self.get_json(status_url).await?;
            match status.state() {
                JobState::Completed => return Ok(status),
                JobState::Failed => {
                    return Err(FirecrawlError::JobFailed(status.error.unwrap_or(status.status)));
                }
                JobState::Running => {
                    tracing::debug!("crawl still running: status={}", status.status);
                    tokio::time::sleep(self.config.poll_interval).await;
                }
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FirecrawlError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.config.api_key)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, FirecrawlError> {
        let status = response.status();
        tracing::debug!("Firecrawl API response status: {}", status);

        if status == 401 || status == 403 {
            return Err(FirecrawlError::AuthError);
        }

        if status == 429 {
            return Err(FirecrawlError::RateLimited);
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(FirecrawlError::HttpError { status: status.as_u16() });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| FirecrawlError::Parse(e.to_string()))
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }
}

#[async_trait]
impl PageDiscovery for FirecrawlClient {
    async fn discover(&self, root_url: &str, limit: u32) -> Result<Vec<PageMetadata>, Error> {
        let documents = self.crawl(&CrawlRequest::markdown(root_url, limit)).await?;
        let crawled = documents.len();

        let pages: Vec<PageMetadata> = documents.into_iter().filter_map(CrawlDocument::into_page).collect();
        if pages.len() < crawled {
            tracing::debug!("dropped {} crawled documents without a URL", crawled - pages.len());
        }

        Ok(pages)
    }
}
