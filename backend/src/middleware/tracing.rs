//! Request tracing middleware

use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::Instrument;

/// Client IP as reported by a fronting proxy
fn client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string());

    forwarded.or_else(|| {
        headers
            .get("x-real-ip")
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string())
    })
}

/// Middleware for logging request information with timing
pub async fn request_tracing(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client_ip = client_ip(request.headers());

    let span = tracing::info_span!("request", method = %method, path = %path);
    let start = Instant::now();

    tracing::debug!(parent: &span, client_ip = ?client_ip, "Request started");

    let response = next.run(request).instrument(span.clone()).await;

    let status = response.status().as_u16();
    let duration_ms = start.elapsed().as_millis();

    let _entered = span.enter();
    if response.status().is_server_error() {
        tracing::error!(status, duration_ms, "Request completed with error");
    } else if response.status().is_client_error() {
        tracing::warn!(status, duration_ms, "Request completed with client error");
    } else {
        tracing::info!(status, duration_ms, "Request completed");
    }

    response
}
