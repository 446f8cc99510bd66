//! The forward rule: request verification and dispatch state machine.
//!
//! Per request the rule walks: match → parse → actions → target → forward.
//! Declining at the match step lets the table try the next rule; every
//! later step produces a response and therefore owns the request.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::Response;

use crate::api::Api;
use crate::http::error::{api_error_response, error_response};
use crate::http::request::GatewayRequest;
use crate::pipeline::{Action, ActionSet, Scope};
use crate::routing::{RouteError, RouteMatcher};
use crate::rules::rule::Rule;
use crate::upstream::forward::{forward, ForwardClient};
use crate::upstream::{Credentials, TargetList};

/// The dispatchable unit binding one backend API's route pattern, its
/// action pipeline and its forwarding target.
#[derive(Debug)]
pub struct ForwardRule {
    name: String,
    api: Api,
    matcher: RouteMatcher,
    targets: TargetList,
    credentials: Option<Credentials>,
    // Mutated only by action propagation during the configuration phase;
    // the serving phase takes read snapshots.
    actions: RwLock<ActionSet>,
    client: ForwardClient,
}

impl ForwardRule {
    /// Build a rule for one backend.
    ///
    /// `target_host` is the backend's base URI (scheme included);
    /// `internal_host` is the gateway's own `host:port` pair the route
    /// pattern is derived from.
    pub fn new(
        api: Api,
        target_host: &str,
        internal_host: &str,
        credentials: Option<Credentials>,
        client: ForwardClient,
    ) -> Result<Self, RouteError> {
        let matcher = RouteMatcher::compile(internal_host, api.plural_names())?;
        let template = format!("{target_host}/{{0}}{{1}}");
        let name = api
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| target_host.to_string());

        tracing::info!(
            pattern = %matcher.pattern(),
            target = %template,
            "forward rule registered"
        );

        Ok(Self {
            name,
            api,
            matcher,
            targets: TargetList::single(1, template),
            credentials,
            actions: RwLock::new(ActionSet::new()),
            client,
        })
    }

    pub fn api(&self) -> &Api {
        &self.api
    }

    /// Number of actions attached to this rule.
    pub fn action_count(&self) -> usize {
        self.actions.read().expect("action set lock poisoned").len()
    }

    /// Snapshot of the action set, taken outside any await point.
    fn actions(&self) -> ActionSet {
        self.actions
            .read()
            .expect("action set lock poisoned")
            .clone()
    }

    /// Steps 2 and 3 of the state machine: parse the path against the
    /// backend schema, then run the action pipeline over a fresh scope.
    /// Any failure yields the response to send; the request is handled
    /// either way.
    async fn verify_route(&self, req: &GatewayRequest) -> Result<(), Response> {
        let url = match req.url() {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(error = %e, href = %req.href(), "href is not a parseable url");
                return Err(error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                ));
            }
        };

        let route: Vec<&str> = url.path().split('/').filter(|s| !s.is_empty()).collect();

        let request = match self.api.parse_request(&route) {
            Ok(request) => request,
            Err(e) => return Err(api_error_response(e)),
        };

        if request.path.segments.is_empty() {
            return Err(error_response(StatusCode::NOT_FOUND, "Not Found"));
        }

        let scope = Scope::new(request, url);
        if let Err(e) = self.actions().run(scope).await {
            return Err(api_error_response(e));
        }

        Ok(())
    }
}

#[async_trait]
impl Rule for ForwardRule {
    fn name(&self) -> &str {
        &self.name
    }

    async fn try_handle(&self, req: &GatewayRequest) -> Option<Response> {
        // 1. Match; declining hands the request to the next rule.
        let args = self.matcher.matches(req.href())?;

        // 2–3. Parse and authorize; failures own the request.
        if let Err(response) = self.verify_route(req).await {
            return Some(response);
        }

        // 4. Target selection.
        let Some(target) = self.targets.pick() else {
            return Some(error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                "The proxy server is unable to connect to an upstream server",
            ));
        };

        // 5. Basic challenge, then forward.
        if let Some(credentials) = &self.credentials {
            if let Err(challenge) = credentials.check(&req.headers) {
                return Some(challenge);
            }
        }

        Some(forward(&self.client, req, target, &args).await)
    }

    fn register_action(&self, action: Arc<dyn Action>) {
        self.actions
            .write()
            .expect("action set lock poisoned")
            .insert(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiEdge, ApiMetadata};
    use crate::rules::rule::UnsupportedProtocol;
    use crate::upstream::forward::build_client;
    use axum::body::Bytes;
    use axum::http::{HeaderMap, Method, Version};

    fn widget_api() -> Api {
        Api::from_metadata(ApiMetadata {
            name: Some("widget-api".into()),
            edges: vec![ApiEdge {
                name: "widget".into(),
                plural_name: "widgets".into(),
            }],
        })
    }

    fn rule() -> ForwardRule {
        ForwardRule::new(
            widget_api(),
            "http://127.0.0.1:1",
            "localhost:8080",
            None,
            build_client(),
        )
        .unwrap()
    }

    fn request(path_and_query: &str) -> GatewayRequest {
        GatewayRequest::new(
            "http",
            "localhost:8080",
            Method::GET,
            path_and_query.parse().unwrap(),
            Version::HTTP_11,
            HeaderMap::new(),
            Bytes::new(),
        )
    }

    #[tokio::test]
    async fn test_unmatched_href_declines() {
        assert!(rule().try_handle(&request("/sprockets/1")).await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_nested_segment_is_bad_request() {
        // Matches the pattern but the second edge name fails schema parsing.
        let response = rule()
            .try_handle(&request("/widgets/7/bolts"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_zero_segment_path_is_not_found() {
        // The pattern matches inside the query string while the path itself
        // is empty, so the parsed request has zero segments.
        let response = rule()
            .try_handle(&request("/?to=localhost:8080/widgets"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_websocket_handling_always_rejects() {
        let err: UnsupportedProtocol = rule()
            .try_handle_web_socket("http://localhost:8080/widgets")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not supported"));
    }
}
