//! Service error types.

use thiserror::Error;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors raised by the async collaborators.
///
/// Display strings are user-facing: panels show them verbatim.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A required API key was not configured.
    #[error("{service} API key is missing.")]
    MissingApiKey {
        /// Service the key belongs to.
        service: &'static str,
    },

    /// A configured base URL is invalid.
    #[error("invalid service URL: {0}")]
    InvalidUrl(String),

    /// HTTP layer failed (connection, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("failed to parse response payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The upstream service answered with a non-success status.
    #[error("{message}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// User-facing message.
        message: String,
    },

    /// The identity provider rejected the request.
    #[error("{message}")]
    Auth {
        /// Provider error code, e.g. `EMAIL_EXISTS`.
        code: String,
        /// User-facing message.
        message: String,
    },

    /// A sign-in credential could not be decoded.
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    /// The affordance is disabled by configuration.
    #[error("{0}")]
    Unavailable(String),

    /// A wait exceeded its deadline.
    #[error("timed out: {0}")]
    Timeout(String),

    /// Reading or writing the token store failed.
    #[error("token store error: {0}")]
    TokenStore(#[from] std::io::Error),
}

impl ServiceError {
    /// Returns true if this error is transient and the request may be retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout(_) => true,
            Self::Upstream { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_message() {
        let err = ServiceError::MissingApiKey { service: "Giphy" };
        assert_eq!(err.to_string(), "Giphy API key is missing.");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_upstream_retryable_by_status() {
        let busy = ServiceError::Upstream {
            status: 503,
            message: "Failed to fetch from Giphy.".into(),
        };
        assert!(busy.is_retryable());
        assert_eq!(busy.to_string(), "Failed to fetch from Giphy.");

        let forbidden = ServiceError::Upstream {
            status: 403,
            message: "nope".into(),
        };
        assert!(!forbidden.is_retryable());
        assert!(ServiceError::Timeout("ready".into()).is_retryable());
    }
}
