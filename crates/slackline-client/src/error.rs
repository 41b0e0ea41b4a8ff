//! Client error types.

use std::path::PathBuf;

use thiserror::Error;

/// Remote error codes that mean the credential itself is unusable.
const AUTH_ERROR_CODES: &[&str] = &[
    "invalid_auth",
    "not_authed",
    "account_inactive",
    "token_revoked",
    "token_expired",
];

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The remote envelope reported `ok: false`.
    #[error("API error from {method}: {error}")]
    Api {
        /// API method that was called.
        method: String,
        /// Error code reported by the remote service.
        error: String,
    },

    /// The remote service asked the caller to slow down.
    #[error("Rate limited on {method} (retry after {retry_after:?}s)")]
    RateLimited {
        /// API method that was called.
        method: String,
        /// Seconds from the `Retry-After` header, when present.
        retry_after: Option<u64>,
    },

    /// Non-success HTTP status without a usable envelope.
    #[error("HTTP {status} from {method}")]
    Status {
        /// API method that was called.
        method: String,
        /// HTTP status code.
        status: u16,
    },

    /// Failed to read a trust root file.
    #[error("Failed to read CA certificate '{}': {source}", path.display())]
    ReadCert {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Check if this error means the credential was rejected.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Error::Api { error, .. } => AUTH_ERROR_CODES.contains(&error.as_str()),
            Error::Status { status, .. } => *status == 401,
            _ => false,
        }
    }

    /// Check if this is a rate limit error.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Error::RateLimited { .. })
            || matches!(self, Error::Api { error, .. } if error == "ratelimited")
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_classification() {
        let err = Error::Api {
            method: "auth.test".to_string(),
            error: "invalid_auth".to_string(),
        };
        assert!(err.is_auth_error());
        assert!(!err.is_rate_limited());

        let err = Error::Api {
            method: "users.list".to_string(),
            error: "missing_scope".to_string(),
        };
        assert!(!err.is_auth_error());

        let err = Error::Status {
            method: "auth.test".to_string(),
            status: 401,
        };
        assert!(err.is_auth_error());
    }

    #[test]
    fn test_rate_limit_classification() {
        let err = Error::RateLimited {
            method: "conversations.list".to_string(),
            retry_after: Some(30),
        };
        assert!(err.is_rate_limited());
        assert!(err.to_string().contains("conversations.list"));
    }
}
