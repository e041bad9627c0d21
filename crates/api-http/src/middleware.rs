//! Request logging middleware

use axum::body::Body;
use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;
use tracing::{info, warn};

/// Log one line per HTTP request, static file hits included
///
/// Only the path is logged, never the query string. 5xx responses are logged
/// at `warn`; diagnostic failures travel in a 200 body and stay at `info`.
pub async fn log_http_request(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let host = request_host(&req).to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    if response.status().is_server_error() {
        warn!(%method, %path, %host, status, elapsed_ms, "HTTP request failed");
    } else {
        info!(%method, %path, %host, status, elapsed_ms, "HTTP request");
    }

    response
}

/// `Host` header, or `-` when absent or not valid UTF-8
fn request_host<B>(req: &Request<B>) -> &str {
    req.headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
}
