use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::debug;

/// Stamps every response with how long the handler took:
///
///   X-Response-Time-Us  — wall time in microseconds
///   Server-Timing       — the same value for browser dev tools
///
/// and emits one debug-level log line per request. Useful when deciding
/// whether a slow endpoint is the service or a store dragging its feet.
pub async fn timing_middleware(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let started = Instant::now();
    let mut response = next.run(req).await;
    let elapsed = started.elapsed();

    let micros = elapsed.as_micros() as u64;
    if let Ok(value) = micros.to_string().parse() {
        response.headers_mut().insert("X-Response-Time-Us", value);
    }
    if let Ok(value) =
        format!("total;dur={:.3}", elapsed.as_secs_f64() * 1000.0).parse()
    {
        response.headers_mut().insert("Server-Timing", value);
    }

    debug!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_us = micros,
        "request"
    );

    response
}
