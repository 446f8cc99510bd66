//! Plain-text, status-coded error responses.
//!
//! Every per-request failure in the gateway core surfaces through here:
//! a numeric status plus a short plain-text message, nothing else.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::api::ApiError;

/// Build a plain-text error response.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, message.to_string()).into_response()
}

/// Translate a schema/pipeline error into a response.
///
/// Edge errors surface verbatim; anything else is logged and becomes a
/// generic 500 with no internal details leaked.
pub fn api_error_response(err: ApiError) -> Response {
    match err {
        ApiError::Edge { status, message } => error_response(status, &message),
        ApiError::Internal(e) => {
            tracing::error!(error = %e, "unexpected error while verifying route");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_error_surfaces_verbatim() {
        let response =
            api_error_response(ApiError::edge(StatusCode::PAYMENT_REQUIRED, "Payment Required"));
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    }

    #[test]
    fn test_internal_error_becomes_500() {
        let response = api_error_response(ApiError::internal(std::io::Error::other("boom")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
