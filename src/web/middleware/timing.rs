//! # Request Timing Middleware

use axum::extract::{Request, State};
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub static PROCESS_TIME_HEADER: HeaderName = HeaderName::from_static("x-process-time");

/// Add `X-Process-Time` (elapsed milliseconds) and log requests slower than
/// the configured threshold at warn level
pub async fn record_process_time(
    State(slow_threshold): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let mut response = next.run(request).await;

    let elapsed = start.elapsed();
    let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
    if let Ok(value) = HeaderValue::from_str(&format!("{elapsed_ms:.2}ms")) {
        response
            .headers_mut()
            .insert(PROCESS_TIME_HEADER.clone(), value);
    }

    let status = response.status().as_u16();
    if elapsed > slow_threshold {
        warn!(%method, path = %path, status, elapsed_ms, "🐢 Slow request");
    } else {
        debug!(%method, path = %path, status, elapsed_ms, "Request completed");
    }

    response
}
