//! Client error types.

use crate::refresh::RefreshOutcome;
use mementum_core::ValidationError;
use thiserror::Error;

/// Errors surfaced by the mementum HTTP client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response was received (DNS, connection, timeout). Never retried.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A request was rejected with 401 and the session could not be renewed.
    #[error("Not authenticated: {outcome}")]
    Unauthenticated {
        /// Why the refresh failed.
        outcome: RefreshOutcome,
    },

    /// The backend answered with a non-success status.
    #[error("HTTP error {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A URL could not be built.
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },

    /// Client configuration is unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input was rejected before sending.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ClientError {
    /// Create a status error.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Whether the caller should send the user back to sign-in.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated { .. })
    }

    /// HTTP status, when the error carries one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Unauthenticated { .. } => Some(401),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthenticated() {
        let err = ClientError::Unauthenticated {
            outcome: RefreshOutcome::Rejected { status: 403 },
        };
        assert!(err.is_unauthenticated());
        assert_eq!(err.status_code(), Some(401));
        assert!(!ClientError::status(500, "boom").is_unauthenticated());
    }

    #[test]
    fn test_status_code() {
        let err = ClientError::status(404, "missing");
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.to_string(), "HTTP error 404: missing");

        let err = ClientError::Configuration("no base url".into());
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_validation_is_transparent() {
        let err = ClientError::from(ValidationError::EmptyContent);
        assert_eq!(err.to_string(), "Note content must not be empty");
    }
}
