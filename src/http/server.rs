//! HTTP server setup and dispatch.
//!
//! # Responsibilities
//! - Build the axum router with the catch-all dispatch handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Walk the frozen rule table first-match-wins per request
//! - Reject WebSocket upgrade attempts
//! - Serve with graceful shutdown

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::http::error::error_response;
use crate::http::request::{GatewayRequest, MakeRequestUuid};
use crate::observability::metrics;
use crate::rules::RuleTable;

/// How a listener presents itself to the dispatch handler.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// "http" or "https"; used to rebuild the href.
    pub scheme: &'static str,

    /// The listener's own `host:port`, the Host-header fallback.
    pub authority: String,

    /// Per-request timeout.
    pub request_timeout: Duration,
}

/// Application state injected into the dispatch handler.
#[derive(Clone)]
struct AppState {
    table: RuleTable,
    scheme: &'static str,
    authority: String,
}

/// One gateway listener over a frozen rule table.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(table: RuleTable, options: ServerOptions) -> Self {
        let state = AppState {
            table,
            scheme: options.scheme,
            authority: options.authority,
        };

        let router = Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state)
            .layer(TimeoutLayer::new(options.request_timeout))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http());

        Self { router }
    }

    /// The configured router, for listeners that serve it themselves
    /// (the TLS listener goes through axum-server).
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Serve on an already-bound listener until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "http server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!(address = %addr, "http server stopped");
        Ok(())
    }
}

/// Main dispatch handler: buffer the request, walk the rule table, answer.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();

    let req = match GatewayRequest::from_request(request, state.scheme, &state.authority).await {
        Ok(req) => req,
        Err(response) => return response,
    };

    let method = req.method.to_string();

    if req.is_upgrade() {
        if let Err(e) = state.table.dispatch_web_socket(req.href()).await {
            tracing::error!(href = %req.href(), error = %e, "websocket upgrade rejected");
            metrics::record_request(&method, 501, "none", start);
            return error_response(StatusCode::NOT_IMPLEMENTED, &e.to_string());
        }
    }

    tracing::debug!(
        request_id = req.request_id().unwrap_or("unknown"),
        method = %method,
        href = %req.href(),
        "dispatching request"
    );

    match state.table.dispatch(&req).await {
        Some((response, rule)) => {
            metrics::record_request(&method, response.status().as_u16(), rule, start);
            response
        }
        None => {
            // No rule owned the request and no fallback is registered.
            tracing::debug!(href = %req.href(), "no rule matched");
            metrics::record_request(&method, 404, "none", start);
            (StatusCode::NOT_FOUND, "No matching rule found").into_response()
        }
    }
}
