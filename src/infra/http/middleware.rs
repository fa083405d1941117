//! Request instrumentation shared by both listeners.

use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tracing::{error, warn};
use uuid::Uuid;

use crate::application::error::ErrorReport;

/// Correlation id threaded through request and response extensions.
#[derive(Debug, Clone, Copy)]
pub struct RequestId(Uuid);

impl RequestId {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Outermost layer: stamp every request, and mirror the id onto the
/// response so failure logs can be correlated.
pub async fn tag_request(mut request: Request<Body>, next: Next) -> Response {
    let id = RequestId::fresh();
    request.extensions_mut().insert(id);

    let mut response = next.run(request).await;
    response.extensions_mut().insert(id);
    response
}

/// Log every 4xx/5xx response, pulling the diagnostic report a handler
/// attached to the response extensions.
pub async fn log_responses(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request.extensions().get::<RequestId>().copied();
    let started = Instant::now();

    let mut response = next.run(request).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let elapsed_ms = started.elapsed().as_millis() as u64;
    let request_id = request_id.map(|id| id.to_string()).unwrap_or_default();
    let report = response.extensions_mut().remove::<ErrorReport>();
    let (source, detail, chain) = match report {
        Some(report) => (report.source, report.detail, report.chain),
        None => ("unknown", "no diagnostic attached".to_string(), Vec::new()),
    };

    if status.is_server_error() {
        error!(
            target = "brezza::http::response",
            status = status.as_u16(),
            method = %method,
            path = path,
            elapsed_ms = elapsed_ms,
            source = source,
            detail = %detail,
            chain = ?chain,
            request_id = request_id,
            "request failed",
        );
    } else {
        warn!(
            target = "brezza::http::response",
            status = status.as_u16(),
            method = %method,
            path = path,
            elapsed_ms = elapsed_ms,
            source = source,
            detail = %detail,
            request_id = request_id,
            "client request error",
        );
    }

    response
}
