use axum::{
    middleware as axum_mw,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::handlers;
use crate::middleware::timing;
use crate::AppState;

/// Builds the full Axum `Router`: the two boundary operations plus the
/// ops snapshot, with timing and CORS middleware applied globally.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // ── Metric endpoints ────────────────────────────────────
        .route(
            "/metrics",
            post(handlers::metrics::submit_metric)
                .get(handlers::metrics::query_metrics),
        )
        // ── Ops visibility ──────────────────────────────────────
        .route("/status", get(handlers::status::ops_status))
        // ── Provide shared state to all routes above ────────────
        .with_state(state)
        // ── Global middleware (applied bottom-up) ───────────────
        .layer(axum_mw::from_fn(timing::timing_middleware))
        .layer(CorsLayer::permissive())
}
