//! The polymorphic dispatchable unit.

use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use thiserror::Error;

use crate::http::request::GatewayRequest;
use crate::pipeline::Action;

/// WebSocket proxying is categorically absent from this gateway.
#[derive(Debug, Error)]
#[error("WebSockets are not supported by the API gateway")]
pub struct UnsupportedProtocol;

/// One dispatchable unit in the rule table.
///
/// `try_handle` returns `Some(response)` when the rule owns the request
/// (even if that response is an error) and `None` to decline, letting the
/// table try the next rule.
#[async_trait]
pub trait Rule: Send + Sync {
    /// Short name for logging and metrics.
    fn name(&self) -> &str;

    async fn try_handle(&self, req: &GatewayRequest) -> Option<Response>;

    /// Always rejects: this is a capability gap, not a policy choice.
    async fn try_handle_web_socket(&self, _href: &str) -> Result<bool, UnsupportedProtocol> {
        Err(UnsupportedProtocol)
    }

    /// Attach an action to this rule. Rules that cannot meaningfully run
    /// actions (e.g. opaque external handlers) ignore the call.
    fn register_action(&self, _action: Arc<dyn Action>) {}
}
