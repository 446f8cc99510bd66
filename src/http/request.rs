//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) as early as possible
//! - Buffer the request into an owned, cloneable envelope for dispatch
//! - Derive the href rules match against and detect upgrade attempts
//!
//! # Design Decisions
//! - The href is `<scheme>://<authority><path?query>`, authority taken from
//!   the Host header with the listener's own authority as fallback
//! - The body is buffered up front so a declining rule costs nothing and
//!   the next rule sees the same request

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode, Uri, Version};
use axum::response::Response;
use tower_http::request_id::{MakeRequestId, RequestId};
use url::Url;

use crate::http::error::error_response;

/// Upper bound on buffered request bodies.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// An inbound request, buffered and owned, as seen by the rule table.
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    pub method: Method,
    pub uri: Uri,
    pub version: Version,
    pub headers: HeaderMap,
    pub body: Bytes,
    scheme: String,
    href: String,
}

impl GatewayRequest {
    /// Assemble an envelope from already-buffered pieces.
    ///
    /// `fallback_authority` is the listener's own `host:port`, used when the
    /// client sent no Host header.
    pub fn new(
        scheme: &str,
        fallback_authority: &str,
        method: Method,
        uri: Uri,
        version: Version,
        headers: HeaderMap,
        body: Bytes,
    ) -> Self {
        let authority = headers
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .unwrap_or(fallback_authority);
        let path_and_query = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let href = format!("{scheme}://{authority}{path_and_query}");

        Self {
            method,
            uri,
            version,
            headers,
            body,
            scheme: scheme.to_string(),
            href,
        }
    }

    /// Buffer an axum request into an envelope. Oversized bodies are
    /// rejected before any rule runs.
    pub async fn from_request(
        request: Request<Body>,
        scheme: &str,
        fallback_authority: &str,
    ) -> Result<Self, Response> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "failed to buffer request body");
                error_response(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
            })?;

        Ok(Self::new(
            scheme,
            fallback_authority,
            parts.method,
            parts.uri,
            parts.version,
            parts.headers,
            body,
        ))
    }

    /// The full URL string rules match against.
    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Parse the href into a URL for the scope.
    pub fn url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.href)
    }

    /// True for WebSocket upgrade attempts, which the gateway categorically
    /// rejects.
    pub fn is_upgrade(&self) -> bool {
        self.headers
            .get(header::UPGRADE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.eq_ignore_ascii_case("websocket"))
            .unwrap_or(false)
    }

    pub fn request_id(&self) -> Option<&str> {
        self.headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
    }
}

/// UUID-v4 request IDs for the tower-http request-id layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}
