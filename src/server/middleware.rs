//! Action logging for mutating requests
//!
//! Records method, path, query, status, and latency for every POST, PUT,
//! and DELETE as structured tracing events. Reads pass through untouched.

use axum::{extract::Request, http::Method, middleware::Next, response::Response};
use std::time::Instant;

pub async fn action_log(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    if !matches!(method, Method::POST | Method::PUT | Method::DELETE) {
        return next.run(request).await;
    }

    let path = request.uri().path().to_string();
    let query = request.uri().query().unwrap_or("").to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        target: "depot::action",
        %method,
        %path,
        query = %query,
        status = response.status().as_u16(),
        latency_ms = start.elapsed().as_millis() as u64,
        "action"
    );
    response
}
