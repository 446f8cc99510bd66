//! The catch-all fallback rule.

use futures_util::future::BoxFuture;
use std::future::Future;

use async_trait::async_trait;
use axum::response::Response;

use crate::http::request::GatewayRequest;
use crate::rules::rule::Rule;

type Handler = Box<dyn Fn(GatewayRequest) -> BoxFuture<'static, Response> + Send + Sync>;

/// A rule that matches any request and delegates entirely to an external
/// handler. Always the last entry in the rule table.
pub struct FallbackRule {
    handler: Handler,
}

impl FallbackRule {
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(GatewayRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        Self {
            handler: Box::new(move |req| Box::pin(handler(req))),
        }
    }
}

#[async_trait]
impl Rule for FallbackRule {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn try_handle(&self, req: &GatewayRequest) -> Option<Response> {
        Some((self.handler)(req.clone()).await)
    }

    // Actions are meaningless for an opaque external handler; the default
    // no-op register_action is the intended behavior here.
}
