//! Per-request execution context.

use url::Url;

use crate::api::ApiRequest;

/// Who the request is acting as.
///
/// Every request starts as a guest; actions may elevate it.
#[derive(Debug, Clone)]
pub struct Identity {
    pub role: String,
    pub account: Option<serde_json::Value>,
}

impl Identity {
    pub fn guest() -> Self {
        Self {
            role: "guest".to_string(),
            account: None,
        }
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::guest()
    }
}

/// The mutable per-request context threaded through the action pipeline.
///
/// Lives for exactly one request: created when a forward rule starts route
/// verification, handed by value from action to action, dropped when the
/// pipeline completes or aborts.
#[derive(Debug, Clone)]
pub struct Scope {
    /// The request parsed against the backend's schema.
    pub request: ApiRequest,

    /// The parsed request URL.
    pub url: Url,

    /// The identity attached to this request.
    pub identity: Identity,
}

impl Scope {
    /// Create a fresh scope with the default guest identity.
    pub fn new(request: ApiRequest, url: Url) -> Self {
        Self {
            request,
            url,
            identity: Identity::guest(),
        }
    }
}
