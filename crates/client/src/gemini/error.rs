//! Gemini API client error types.

use docscout_core::Error;
use std::sync::Arc;

/// Errors from the Gemini generateContent client.
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    /// No API key configured.
    #[error("missing API key: GOOGLE_API_KEY not set")]
    MissingApiKey,

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    AuthError,

    /// Rate limited or out of quota.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// The model returned no text (blocked prompt, empty candidates).
    #[error("empty response: {0}")]
    EmptyResponse(String),

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

impl From<reqwest::Error> for GeminiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { GeminiError::Timeout } else { GeminiError::Network(Arc::new(err)) }
    }
}

impl From<GeminiError> for Error {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::MissingApiKey => Error::MissingCredentials(err.to_string()),
            GeminiError::AuthError => Error::AuthError(err.to_string()),
            GeminiError::RateLimited => Error::RateLimited(err.to_string()),
            GeminiError::Timeout => Error::Timeout(err.to_string()),
            _ => Error::FilterFailed(err.to_string()),
        }
    }
}
