//! Firecrawl API client error types.

use docscout_core::Error;
use std::sync::Arc;

/// Errors from the Firecrawl crawl API client.
#[derive(Debug, thiserror::Error)]
pub enum FirecrawlError {
    /// No API key configured.
    #[error("missing API key: FIRECRAWL_API_KEY not set")]
    MissingApiKey,

    /// Crawl request rejected before sending.
    #[error("invalid crawl request: {0}")]
    InvalidRequest(String),

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    AuthError,

    /// Rate limited by Firecrawl.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Firecrawl accepted the request but reported failure.
    #[error("crawl failed: {0}")]
    JobFailed(String),

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for FirecrawlError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { FirecrawlError::Timeout } else { FirecrawlError::Network(Arc::new(err)) }
    }
}

impl From<FirecrawlError> for Error {
    fn from(err: FirecrawlError) -> Self {
        match err {
            FirecrawlError::MissingApiKey => Error::MissingCredentials(err.to_string()),
            FirecrawlError::InvalidRequest(msg) => Error::InvalidInput(msg),
            FirecrawlError::AuthError => Error::AuthError(err.to_string()),
            FirecrawlError::RateLimited => Error::RateLimited(err.to_string()),
            FirecrawlError::Timeout => Error::Timeout(err.to_string()),
            _ => Error::DiscoveryFailed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FirecrawlError::MissingApiKey;
        assert!(err.to_string().contains("FIRECRAWL_API_KEY"));

        let err = FirecrawlError::JobFailed("cancelled".to_string());
        assert!(err.to_string().contains("crawl failed"));
    }

    #[test]
    fn test_into_core_error() {
        assert!(matches!(Error::from(FirecrawlError::MissingApiKey), Error::MissingCredentials(_)));
        assert!(matches!(Error::from(FirecrawlError::HttpError { status: 502 }), Error::DiscoveryFailed(_)));
        assert!(matches!(Error::from(FirecrawlError::Timeout), Error::Timeout(_)));
    }
}
