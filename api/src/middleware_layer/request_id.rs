use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::info;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Reuses the caller's `X-Request-Id` or mints one from the current time.
fn request_id_of(req: &Request<Body>) -> String {
    req.headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            let nanos = Utc::now()
                .timestamp_nanos_opt()
                .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
            format!("req-{nanos}")
        })
}

/// Echoes a request id on every response and logs one line per request.
pub async fn request_id(req: Request<Body>, next: Next) -> Response {
    let id = request_id_of(&req);
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let mut res = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    info!(
        request_id = %id,
        %method,
        %path,
        status = res.status().as_u16(),
        latency_ms = started.elapsed().as_millis(),
        "handled"
    );
    res
}
