//! The gateway façade.
//!
//! # Responsibilities
//! - Register backend APIs (fetch `/.api-core`, build forward rules)
//! - Broadcast global actions to every rule, existing and future
//! - Stage extra rules and the fallback for listen-time materialization
//! - Start the enabled listeners behind a counted ready barrier
//!
//! # Design Decisions
//! - Registration and serving are temporally disjoint phases; freezing the
//!   rule table consumes the builder, so any registration after listen()
//!   fails fast instead of silently racing live traffic
//! - Registration fetches may run concurrently; appends to the builder are
//!   serialized by the configuration lock

use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::api::{Api, ApiMetadata};
use crate::http::request::GatewayRequest;
use crate::http::server::{HttpServer, ServerOptions};
use crate::lifecycle::{Shutdown, StartBarrier, StartSignal};
use crate::pipeline::{Action, ActionSet};
use crate::routing::RouteError;
use crate::rules::{FallbackRule, ForwardRule, Rule, RuleTable, RuleTableBuilder};
use crate::upstream::forward::{build_client, ForwardClient};
use crate::upstream::Credentials;

/// TLS material for the HTTPS listener.
#[derive(Debug, Clone)]
pub struct TlsOptions {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Options controlling the gateway's listeners and route derivation.
#[derive(Debug, Clone)]
pub struct GatewayOptions {
    /// Enable the plain-HTTP listener.
    pub http: bool,

    /// Enable the HTTPS listener.
    pub https: bool,

    /// Bind host for the listeners.
    pub host: String,

    /// Host the route patterns are derived from.
    pub internal_host: String,

    /// HTTP port.
    pub port: u16,

    /// HTTPS port.
    pub https_port: u16,

    /// Accepted for compatibility; never consumed by registration or
    /// dispatch logic.
    pub retry_ms: u64,

    /// TLS material, required when `https` is enabled.
    pub tls: Option<TlsOptions>,

    /// Per-request timeout applied by the listeners.
    pub request_timeout: Duration,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            http: true,
            https: false,
            host: "localhost".to_string(),
            internal_host: "localhost".to_string(),
            port: 80,
            https_port: 443,
            retry_ms: 2000,
            tls: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Errors surfaced to whoever is configuring the gateway.
///
/// These are never caught internally: a failing registration fails the
/// start-up sequence loudly.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("backend registration failed: {0}")]
    Registration(#[from] reqwest::Error),

    #[error("backend cannot be routed: {0}")]
    Route(#[from] RouteError),

    #[error("gateway is already listening; registration is closed")]
    AlreadyListening,

    #[error("https is enabled but no TLS options were provided")]
    MissingTls,
}

/// Mutable configuration-phase state, consumed at listen time.
struct GatewayState {
    builder: Option<RuleTableBuilder>,
    extra_rules: Vec<Arc<dyn Rule>>,
    fallback: Option<Arc<dyn Rule>>,
    actions: ActionSet,
}

/// The single entry point in front of many backend APIs.
pub struct Gateway {
    options: GatewayOptions,
    client: ForwardClient,
    fetch: reqwest::Client,
    state: Mutex<GatewayState>,
}

/// Running listeners plus their shutdown coordinator.
pub struct GatewayHandle {
    shutdown: Shutdown,
    tasks: Vec<JoinHandle<()>>,
}

impl GatewayHandle {
    /// Signal every listener to drain and stop.
    pub fn shutdown(&self) {
        self.shutdown.trigger();
    }

    /// Wait for every listener task to finish.
    pub async fn wait(self) {
        for task in self.tasks {
            let _ = task.await;
        }
    }
}

impl Gateway {
    pub fn new(options: GatewayOptions) -> Self {
        Self {
            options,
            client: build_client(),
            fetch: reqwest::Client::new(),
            state: Mutex::new(GatewayState {
                builder: Some(RuleTableBuilder::new()),
                extra_rules: Vec::new(),
                fallback: None,
                actions: ActionSet::new(),
            }),
        }
    }

    pub fn options(&self) -> &GatewayOptions {
        &self.options
    }

    /// The `host:port` pair route patterns are derived from.
    fn internal_authority(&self) -> String {
        format!("{}:{}", self.options.internal_host, self.options.port)
    }

    /// Register a backend API.
    ///
    /// Fetches `GET <uri>/.api-core`, builds the forward rule targeting
    /// `uri`, appends it to the rule table and applies every global action
    /// already registered. The returned rule accepts rule-specific actions.
    pub async fn register_backend(&self, uri: &str) -> Result<Arc<ForwardRule>, GatewayError> {
        self.register_backend_with(uri, None).await
    }

    /// Like [`register_backend`](Self::register_backend), with HTTP Basic
    /// credentials guarding the rule.
    pub async fn register_backend_with(
        &self,
        uri: &str,
        credentials: Option<Credentials>,
    ) -> Result<Arc<ForwardRule>, GatewayError> {
        // The fetch runs outside the configuration lock so concurrent
        // registrations overlap; only the append is serialized.
        let metadata: ApiMetadata = self
            .fetch
            .get(format!("{uri}/.api-core"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let api = Api::from_metadata(metadata);
        let rule = Arc::new(ForwardRule::new(
            api,
            uri,
            &self.internal_authority(),
            credentials,
            self.client.clone(),
        )?);

        let mut guard = self.state.lock().expect("gateway state lock poisoned");
        let state = &mut *guard;
        let builder = state.builder.as_mut().ok_or(GatewayError::AlreadyListening)?;
        builder.push(rule.clone());
        for action in state.actions.iter() {
            rule.register_action(action.clone());
        }

        Ok(rule)
    }

    /// Register a global action: applied to every forward rule already
    /// present and to every rule registered afterwards. Registering the
    /// same instance twice is a no-op.
    pub fn register_action(&self, action: Arc<dyn Action>) -> Result<(), GatewayError> {
        let mut state = self.state.lock().expect("gateway state lock poisoned");
        if state.builder.is_none() {
            return Err(GatewayError::AlreadyListening);
        }

        if state.actions.insert(action.clone()) {
            if let Some(builder) = &state.builder {
                builder.broadcast_action(&action);
            }
        }
        Ok(())
    }

    /// Stage a caller-supplied rule, materialized into the table at listen
    /// time, after every forward rule.
    pub fn register_rule(&self, rule: Arc<dyn Rule>) -> Result<(), GatewayError> {
        let mut state = self.state.lock().expect("gateway state lock poisoned");
        if state.builder.is_none() {
            return Err(GatewayError::AlreadyListening);
        }
        state.extra_rules.push(rule);
        Ok(())
    }

    /// Stage the catch-all fallback handler; it becomes the final table
    /// entry at listen time. A later call before listening replaces the
    /// staged handler.
    pub fn register_fallback<F, Fut>(&self, handler: F) -> Result<(), GatewayError>
    where
        F: Fn(GatewayRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        let mut state = self.state.lock().expect("gateway state lock poisoned");
        if state.builder.is_none() {
            return Err(GatewayError::AlreadyListening);
        }
        state.fallback = Some(Arc::new(FallbackRule::new(handler)));
        Ok(())
    }

    /// Freeze the rule table and start every enabled listener.
    ///
    /// `callback` fires exactly once, after all enabled listeners have
    /// bound; with no listener enabled it never fires. A bind failure is
    /// logged and suppresses the callback.
    pub async fn listen<F>(&self, callback: F) -> Result<GatewayHandle, GatewayError>
    where
        F: FnOnce() + Send + 'static,
    {
        if self.options.https && self.options.tls.is_none() {
            return Err(GatewayError::MissingTls);
        }

        let table = {
            let mut state = self.state.lock().expect("gateway state lock poisoned");
            let builder = state.builder.take().ok_or(GatewayError::AlreadyListening)?;
            let extra_rules = std::mem::take(&mut state.extra_rules);
            let fallback = state.fallback.take();
            builder.freeze(extra_rules, fallback)
        };

        let shutdown = Shutdown::new();
        let mut barrier = StartBarrier::new();
        let mut tasks = Vec::new();

        if self.options.http {
            tasks.push(self.spawn_http_listener(
                table.clone(),
                barrier.register(),
                shutdown.subscribe(),
            ));
        }

        if self.options.https {
            tasks.push(self.spawn_https_listener(
                table.clone(),
                barrier.register(),
                &shutdown,
            ));
        }

        tracing::info!(
            listeners = barrier.expected(),
            rules = table.len(),
            "gateway listening"
        );
        tasks.push(barrier.spawn(callback));

        Ok(GatewayHandle { shutdown, tasks })
    }

    fn spawn_http_listener(
        &self,
        table: RuleTable,
        ready: StartSignal,
        shutdown: tokio::sync::broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        let host = self.options.host.clone();
        let port = self.options.port;
        let server = HttpServer::new(
            table,
            ServerOptions {
                scheme: "http",
                authority: self.internal_authority(),
                request_timeout: self.options.request_timeout,
            },
        );

        tokio::spawn(async move {
            match TcpListener::bind((host.as_str(), port)).await {
                Ok(listener) => {
                    ready.started();
                    if let Err(e) = server.run(listener, shutdown).await {
                        tracing::error!(error = %e, "http server error");
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, host = %host, port, "http listener failed to bind");
                    ready.failed(e);
                }
            }
        })
    }

    fn spawn_https_listener(
        &self,
        table: RuleTable,
        ready: StartSignal,
        shutdown: &Shutdown,
    ) -> JoinHandle<()> {
        let host = self.options.host.clone();
        let port = self.options.https_port;
        // Presence was checked in listen().
        let tls = self.options.tls.clone();
        let router = HttpServer::new(
            table,
            ServerOptions {
                scheme: "https",
                authority: format!("{}:{}", self.options.internal_host, port),
                request_timeout: self.options.request_timeout,
            },
        )
        .into_router();
        let mut shutdown_rx = shutdown.subscribe();

        tokio::spawn(async move {
            let Some(tls) = tls else {
                ready.failed(std::io::Error::other("https enabled without tls options"));
                return;
            };

            let tls_config = match RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path).await
            {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!(error = %e, "failed to load TLS material");
                    ready.failed(e);
                    return;
                }
            };

            let addr = match tokio::net::lookup_host((host.as_str(), port)).await {
                Ok(mut addrs) => match addrs.next() {
                    Some(addr) => addr,
                    None => {
                        ready.failed(std::io::Error::other(format!(
                            "{host}:{port} resolves to no address"
                        )));
                        return;
                    }
                },
                Err(e) => {
                    ready.failed(e);
                    return;
                }
            };

            let handle = axum_server::Handle::new();

            {
                let handle = handle.clone();
                tokio::spawn(async move {
                    let _ = shutdown_rx.recv().await;
                    handle.graceful_shutdown(Some(Duration::from_secs(5)));
                });
            }

            {
                let handle = handle.clone();
                tokio::spawn(async move {
                    match handle.listening().await {
                        Some(addr) => {
                            tracing::info!(address = %addr, "https server starting");
                            ready.started();
                        }
                        None => ready.failed(std::io::Error::other(
                            "https listener failed to bind",
                        )),
                    }
                });
            }

            if let Err(e) = axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(router.into_make_service())
                .await
            {
                tracing::error!(error = %e, "https server error");
            }
        })
    }
}
