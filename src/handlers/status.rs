use std::sync::Arc;

use axum::{extract::State, Json};

use crate::ops::OpsSnapshot;
use crate::AppState;

// ─── GET /status ─────────────────────────────────────────────────
/// Per-store counters and latency percentiles, useful for spotting a
/// store that keeps losing the write race or timing out on reads.

pub async fn ops_status(
    State(state): State<Arc<AppState>>,
) -> Json<OpsSnapshot> {
    Json(state.ops.snapshot())
}
