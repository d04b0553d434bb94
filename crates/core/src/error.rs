//! Unified error types for docscout.
//!
//! Each variant carries a stable code prefix so tool output and logs can be
//! grepped without parsing the message.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error types for the docscout server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty query).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// A collaborator is missing the credentials it needs.
    #[error("MISSING_CREDENTIALS: {0}")]
    MissingCredentials(String),

    /// Page discovery failed upstream.
    #[error("DISCOVERY_FAILED: {0}")]
    DiscoveryFailed(String),

    /// Relevance filtering failed upstream.
    #[error("FILTER_FAILED: {0}")]
    FilterFailed(String),

    /// Collaborator rejected the credentials.
    #[error("AUTH_ERROR: {0}")]
    AuthError(String),

    /// Collaborator rate limited the request.
    #[error("RATE_LIMITED: {0}")]
    RateLimited(String),

    /// A collaborator call exceeded its deadline.
    #[error("TIMEOUT: {0}")]
    Timeout(String),
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::InvalidUrl(msg) => (-32003, msg.clone()),
            Error::MissingCredentials(msg) => (-32009, msg.clone()),
            Error::DiscoveryFailed(msg) => (-32020, msg.clone()),
            Error::FilterFailed(msg) => (-32021, msg.clone()),
            Error::AuthError(msg) => (-32009, msg.clone()),
            Error::RateLimited(msg) => (-32010, msg.clone()),
            Error::Timeout(msg) => (-32006, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::DiscoveryFailed("crawl job failed".to_string());
        assert!(err.to_string().contains("DISCOVERY_FAILED"));
        assert!(err.to_string().contains("crawl job failed"));
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::InvalidInput("query cannot be empty".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32602);
        assert_eq!(mcp_err.message, "query cannot be empty");
    }

    #[test]
    fn test_credentials_share_auth_code() {
        let missing: McpError = Error::MissingCredentials("no key".into()).into();
        let rejected: McpError = Error::AuthError("bad key".into()).into();
        assert_eq!(missing.code.0, rejected.code.0);
    }
}
