//! Gemini relevance filter.
//!
//! Asks a Gemini model which discovered pages answer a question.
//!
//! ### Protocol
//!
//! - **Endpoint**: `POST {base}/v1beta/models/{model}:generateContent`
//! - **Authentication**: `x-goog-api-key` header.
//! - **Request**: one user turn with the relevance prompt plus `generationConfig`.
//! - **Reply**: a comma-separated URL list or `NONE`.

pub mod error;
pub mod prompt;
pub mod request;
pub mod response;

pub use error::GeminiError;
pub use prompt::{build_prompt, parse_relevant_urls};
pub use request::{GenerateRequest, GenerationConfig};
pub use response::GenerateResponse;

use async_trait::async_trait;
use docscout_core::{AppConfig, Error, PageFilter, PageMetadata};
use reqwest::header;
use std::sync::Arc;
use std::time::{Duration, Instant};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
const DEFAULT_USER_AGENT: &str = "docscout/0.1";

/// Gemini client configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key. An empty key is rejected when a request is made.
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.1,
            max_output_tokens: 2048,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&AppConfig> for GeminiConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_key: config.require_google_api_key().unwrap_or_default().to_string(),
            base_url: config.gemini_base_url.clone(),
            model: config.gemini_model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Gemini API client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new Gemini client. The API key is checked per request.
    pub fn new(config: GeminiConfig) -> Result<Self, GeminiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| GeminiError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    /// Send `prompt` as a single user turn and return the reply text.
    pub async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        if self.config.api_key.is_empty() {
            return Err(GeminiError::MissingApiKey);
        }

        let start = Instant::now();
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        let body = GenerateRequest::user_prompt(
            prompt,
            GenerationConfig { temperature: self.config.temperature, max_output_tokens: self.config.max_output_tokens },
        );

        tracing::debug!("calling Gemini: model={} prompt_len={}", self.config.model, prompt.len());

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Gemini API response status: {}", status);

        // Gemini answers a bad key with 400 API_KEY_INVALID as well as 401/403.
        if status == 401 || status == 403 {
            return Err(GeminiError::AuthError);
        }

        if status == 429 {
            return Err(GeminiError::RateLimited);
        }

        if status.is_client_error() || status.is_server_error() {
            let text = response.text().await.unwrap_or_default();
            if text.contains("API_KEY_INVALID") {
                return Err(GeminiError::AuthError);
            }
            return Err(GeminiError::HttpError { status: status.as_u16() });
        }

        let bytes = response.bytes().await?;
        let parsed: GenerateResponse = serde_json::from_slice(&bytes).map_err(|e| GeminiError::Parse(e.to_string()))?;

        tracing::debug!("Gemini replied in {:?}", start.elapsed());

        parsed.text().ok_or_else(|| GeminiError::EmptyResponse(parsed.empty_reason()))
    }
}

#[async_trait]
impl PageFilter for GeminiClient {
    async fn filter(&self, pages: &[PageMetadata], query: &str) -> Result<Vec<String>, Error> {
        if pages.is_empty() {
            return Ok(Vec::new());
        }

        let reply = self.generate(&build_prompt(pages, query)).await?;
        let urls = parse_relevant_urls(&reply);
        tracing::debug!("model selected {} of {} pages", urls.len(), pages.len());

        Ok(urls)
    }
}
