//! The forward step: proxy a verified request to its chosen target.
//!
//! # Responsibilities
//! - Fill the target's URL template with the route captures
//! - Rebuild the request for the upstream and send it via the shared client
//! - Stream the upstream response back, or a 502 on failure

use axum::body::Body;
use axum::http::{Request, StatusCode, Uri};
use axum::response::Response;
use hyper::body::Incoming;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;

use crate::http::error::error_response;
use crate::http::request::GatewayRequest;
use crate::routing::RouteMatch;
use crate::upstream::target::Target;

/// The shared upstream HTTP client. Cheap to clone; one per gateway.
pub type ForwardClient = Client<HttpConnector, Body>;

pub fn build_client() -> ForwardClient {
    Client::builder(TokioExecutor::new()).build(HttpConnector::new())
}

/// Forward a request to the chosen target, filling the `{0}{1}` template
/// with the matcher captures.
pub async fn forward(
    client: &ForwardClient,
    req: &GatewayRequest,
    target: &Target,
    args: &RouteMatch,
) -> Response {
    let url = target.url_for(&args.resource, &args.rest);

    let uri: Uri = match url.parse() {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(error = %e, url = %url, "target url is not a valid uri");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
        }
    };

    let mut builder = Request::builder()
        .method(req.method.clone())
        .uri(uri)
        .version(req.version);

    if let Some(headers) = builder.headers_mut() {
        for (key, value) in req.headers.iter() {
            headers.insert(key.clone(), value.clone());
        }
    }

    let upstream = match builder.body(Body::from(req.body.clone())) {
        Ok(request) => request,
        Err(e) => {
            tracing::error!(error = %e, "failed to build upstream request");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
        }
    };

    match client.request(upstream).await {
        Ok(response) => {
            tracing::debug!(url = %url, status = %response.status(), "forwarded");
            let (parts, body): (_, Incoming) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(error = %e, url = %url, "upstream request failed");
            error_response(StatusCode::BAD_GATEWAY, "Upstream request failed")
        }
    }
}
