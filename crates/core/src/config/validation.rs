//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `cache_ttl_secs` is 0
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `lookup_timeout_ms` is below `timeout_ms` or exceeds 30 minutes
    /// - `crawl_poll_interval_ms` is 0
    /// - `temperature` is outside 0.0..=2.0
    /// - `max_output_tokens` is 0
    /// - `user_agent`, `gemini_model` or a base URL is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_ttl_secs == 0 {
            return Err(invalid("cache_ttl_secs", "must be greater than 0"));
        }

        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.lookup_timeout_ms < self.timeout_ms {
            return Err(invalid("lookup_timeout_ms", "must not be shorter than timeout_ms"));
        }
        if self.lookup_timeout_ms > 1_800_000 {
            return Err(invalid("lookup_timeout_ms", "must not exceed 30 minutes (1800000ms)"));
        }

        if self.crawl_poll_interval_ms == 0 {
            return Err(invalid("crawl_poll_interval_ms", "must be greater than 0"));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(invalid("temperature", "must be between 0.0 and 2.0"));
        }

        if self.max_output_tokens == 0 {
            return Err(invalid("max_output_tokens", "must be greater than 0"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        if self.gemini_model.is_empty() {
            return Err(invalid("gemini_model", "must not be empty"));
        }

        let base_urls = [("firecrawl_base_url", &self.firecrawl_base_url), ("gemini_base_url", &self.gemini_base_url)];
        for (field, value) in base_urls {
            if url::Url::parse(value).is_err() {
                return Err(invalid(field, "must be an absolute URL"));
            }
        }

        if self.firecrawl_api_key.is_none() {
            tracing::warn!("firecrawl_api_key is not set; page discovery will fail");
        }
        if self.google_api_key.is_none() {
            tracing::warn!("google_api_key is not set; relevance filtering will fail");
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}
