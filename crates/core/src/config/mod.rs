//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (DOCSCOUT_*)
//! 2. Provider key variables (FIRECRAWL_API_KEY, GOOGLE_API_KEY)
//! 3. TOML config file (if DOCSCOUT_CONFIG_FILE set)
//! 4. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (DOCSCOUT_*)
/// 2. FIRECRAWL_API_KEY / GOOGLE_API_KEY
/// 3. TOML config file (if DOCSCOUT_CONFIG_FILE set)
/// 4. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Firecrawl API key used for page discovery.
    ///
    /// Set via DOCSCOUT_FIRECRAWL_API_KEY or FIRECRAWL_API_KEY.
    /// Required only when a lookup misses the cache.
    #[serde(default)]
    pub firecrawl_api_key: Option<String>,

    /// Firecrawl API base URL.
    #[serde(default = "default_firecrawl_base_url")]
    pub firecrawl_base_url: String,

    /// Delay between crawl status polls in milliseconds.
    #[serde(default = "default_crawl_poll_interval_ms")]
    pub crawl_poll_interval_ms: u64,

    /// Google API key used for relevance filtering.
    ///
    /// Set via DOCSCOUT_GOOGLE_API_KEY or GOOGLE_API_KEY.
    #[serde(default)]
    pub google_api_key: Option<String>,

    /// Gemini API base URL.
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,

    /// Gemini model name.
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Sampling temperature for the filtering model.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Output token cap for the filtering model.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Root directory of the result cache.
    ///
    /// Set via DOCSCOUT_CACHE_DIR environment variable.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Cache entry lifetime in seconds.
    ///
    /// Set via DOCSCOUT_CACHE_TTL_SECS environment variable.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request HTTP timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Deadline for a whole collaborator call (a crawl including polling,
    /// or one filtering round-trip) in milliseconds.
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,
}

fn default_firecrawl_base_url() -> String {
    "https://api.firecrawl.dev".into()
}

fn default_crawl_poll_interval_ms() -> u64 {
    2_000
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".into()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_output_tokens() -> u32 {
    2048
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./docscout-cache")
}

fn default_cache_ttl_secs() -> u64 {
    24 * 60 * 60
}

fn default_user_agent() -> String {
    "docscout/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_lookup_timeout_ms() -> u64 {
    300_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            firecrawl_api_key: None,
            firecrawl_base_url: default_firecrawl_base_url(),
            crawl_poll_interval_ms: default_crawl_poll_interval_ms(),
            google_api_key: None,
            gemini_base_url: default_gemini_base_url(),
            gemini_model: default_gemini_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            cache_dir: default_cache_dir(),
            cache_ttl_secs: default_cache_ttl_secs(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            lookup_timeout_ms: default_lookup_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Collaborator deadline as Duration.
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    /// Cache TTL as Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Crawl poll interval as Duration.
    pub fn crawl_poll_interval(&self) -> Duration {
        Duration::from_millis(self.crawl_poll_interval_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment()
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("DOCSCOUT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment
            .merge(Env::raw().only(&["FIRECRAWL_API_KEY", "GOOGLE_API_KEY"]))
            .merge(
                Env::prefixed("DOCSCOUT_")
                    .ignore(&["CONFIG_FILE"])
                    .map(|key| key.as_str().to_lowercase().into())
                    .split("__"),
            )
    }

    /// Firecrawl key, required at discovery time.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the key is not set.
    pub fn require_firecrawl_api_key(&self) -> Result<&str, ConfigError> {
        non_empty(self.firecrawl_api_key.as_deref()).ok_or_else(|| ConfigError::Missing {
            field: "firecrawl_api_key".into(),
            hint: "Set FIRECRAWL_API_KEY or DOCSCOUT_FIRECRAWL_API_KEY".into(),
        })
    }

    /// Google key, required at filtering time.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the key is not set.
    pub fn require_google_api_key(&self) -> Result<&str, ConfigError> {
        non_empty(self.google_api_key.as_deref()).ok_or_else(|| ConfigError::Missing {
            field: "google_api_key".into(),
            hint: "Set GOOGLE_API_KEY or DOCSCOUT_GOOGLE_API_KEY".into(),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
