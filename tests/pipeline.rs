//! Integration tests for the action pipeline and registration phases.

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;

use api_gateway::api::ApiError;
use api_gateway::{Action, Gateway, GatewayError, GatewayOptions, Scope};

mod common;

fn options(port: u16) -> GatewayOptions {
    GatewayOptions {
        host: "127.0.0.1".to_string(),
        internal_host: "127.0.0.1".to_string(),
        port,
        ..GatewayOptions::default()
    }
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(150)).await;
}

struct Recorder {
    label: &'static str,
    log: Arc<Mutex<Vec<&'static str>>>,
}

#[async_trait]
impl Action for Recorder {
    async fn execute(&self, scope: Scope) -> Result<Scope, ApiError> {
        self.log.lock().unwrap().push(self.label);
        Ok(scope)
    }
}

struct Deny;

#[async_trait]
impl Action for Deny {
    async fn execute(&self, _scope: Scope) -> Result<Scope, ApiError> {
        Err(ApiError::edge(StatusCode::FORBIDDEN, "Forbidden"))
    }
}

#[tokio::test]
async fn test_global_actions_run_in_registration_order() {
    let backend_addr: SocketAddr = "127.0.0.1:28311".parse().unwrap();
    common::start_api_backend(backend_addr, "widget-api", &[("widget", "widgets")]).await;

    let log = Arc::new(Mutex::new(Vec::new()));
    let gateway = Gateway::new(options(28312));
    gateway
        .register_backend("http://127.0.0.1:28311")
        .await
        .unwrap();
    gateway
        .register_action(Arc::new(Recorder {
            label: "first",
            log: log.clone(),
        }))
        .unwrap();
    gateway
        .register_action(Arc::new(Recorder {
            label: "second",
            log: log.clone(),
        }))
        .unwrap();
    gateway.listen(|| {}).await.unwrap();
    settle().await;

    let response = common::test_client()
        .get("http://127.0.0.1:28312/widgets/7")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
}

#[tokio::test]
async fn test_same_action_instance_runs_once_per_request() {
    let backend_addr: SocketAddr = "127.0.0.1:28321".parse().unwrap();
    common::start_api_backend(backend_addr, "widget-api", &[("widget", "widgets")]).await;

    let log = Arc::new(Mutex::new(Vec::new()));
    let action: Arc<dyn Action> = Arc::new(Recorder {
        label: "only",
        log: log.clone(),
    });

    let gateway = Gateway::new(options(28322));
    gateway
        .register_backend("http://127.0.0.1:28321")
        .await
        .unwrap();
    gateway.register_action(action.clone()).unwrap();
    gateway.register_action(action).unwrap();
    gateway.listen(|| {}).await.unwrap();
    settle().await;

    let response = common::test_client()
        .get("http://127.0.0.1:28322/widgets/7")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(*log.lock().unwrap(), vec!["only"]);
}

#[tokio::test]
async fn test_denying_action_stops_the_forward() {
    let backend_addr: SocketAddr = "127.0.0.1:28331".parse().unwrap();
    let hits =
        common::start_api_backend(backend_addr, "widget-api", &[("widget", "widgets")]).await;

    let gateway = Gateway::new(options(28332));
    gateway
        .register_backend("http://127.0.0.1:28331")
        .await
        .unwrap();
    gateway.register_action(Arc::new(Deny)).unwrap();
    gateway.listen(|| {}).await.unwrap();
    settle().await;

    let response = common::test_client()
        .get("http://127.0.0.1:28332/widgets/7")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(response.text().await.unwrap(), "Forbidden");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_actions_apply_to_backends_registered_later() {
    let backend_addr: SocketAddr = "127.0.0.1:28341".parse().unwrap();
    common::start_api_backend(backend_addr, "widget-api", &[("widget", "widgets")]).await;

    let log = Arc::new(Mutex::new(Vec::new()));
    let gateway = Gateway::new(options(28342));
    // Action first, backend second: the action must still apply.
    gateway
        .register_action(Arc::new(Recorder {
            label: "early",
            log: log.clone(),
        }))
        .unwrap();
    gateway
        .register_backend("http://127.0.0.1:28341")
        .await
        .unwrap();
    gateway.listen(|| {}).await.unwrap();
    settle().await;

    let response = common::test_client()
        .get("http://127.0.0.1:28342/widgets/7")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(*log.lock().unwrap(), vec!["early"]);
}

#[tokio::test]
async fn test_registration_closes_once_listening() {
    let backend_addr: SocketAddr = "127.0.0.1:28351".parse().unwrap();
    common::start_api_backend(backend_addr, "widget-api", &[("widget", "widgets")]).await;

    let gateway = Gateway::new(options(28352));
    gateway.listen(|| {}).await.unwrap();
    settle().await;

    let err = gateway
        .register_backend("http://127.0.0.1:28351")
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::AlreadyListening));

    let err = gateway.register_action(Arc::new(Deny)).unwrap_err();
    assert!(matches!(err, GatewayError::AlreadyListening));

    let err = gateway
        .register_fallback(|_req| async {
            use axum::response::IntoResponse;
            StatusCode::IM_A_TEAPOT.into_response()
        })
        .unwrap_err();
    assert!(matches!(err, GatewayError::AlreadyListening));
}
