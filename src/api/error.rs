//! Status-coded errors raised while validating a request against a schema.

use axum::http::StatusCode;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error produced while parsing a request against a backend schema or while
/// running the action pipeline.
///
/// `Edge` errors carry an HTTP status and are surfaced to the client
/// verbatim. Anything else is an unexpected internal error: it is logged
/// server-side and the client only ever sees a generic 500.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Edge { status: StatusCode, message: String },

    #[error(transparent)]
    Internal(#[from] BoxError),
}

impl ApiError {
    /// Create a schema error with an explicit status code.
    pub fn edge(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Edge {
            status,
            message: message.into(),
        }
    }

    /// Wrap an arbitrary error as an unexpected internal failure.
    pub fn internal(err: impl Into<BoxError>) -> Self {
        Self::Internal(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_error_keeps_status_and_message() {
        let err = ApiError::edge(StatusCode::BAD_REQUEST, "Unknown resource: foo");
        match err {
            ApiError::Edge { status, ref message } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message, "Unknown resource: foo");
            }
            _ => panic!("expected edge error"),
        }
    }

    #[test]
    fn test_internal_error_display_is_transparent() {
        let err = ApiError::internal(std::io::Error::other("boom"));
        assert_eq!(err.to_string(), "boom");
    }
}
