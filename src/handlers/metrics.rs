use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::sample::{MetricSample, QueryParameters, SampleDraft};
use crate::AppState;

use super::AppError;

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub id: String,
}

// ─── POST /metrics ───────────────────────────────────────────────

pub async fn submit_metric(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<SampleDraft>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    if draft.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "metric name must not be empty".into(),
        ));
    }

    let id = state.coordinator.submit(draft).await?;
    Ok((StatusCode::CREATED, Json(SubmitResponse { id })))
}

// ─── GET /metrics ────────────────────────────────────────────────
/// Always answers 200; stores that were slow or unreachable simply do
/// not contribute to the result.

pub async fn query_metrics(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QueryParameters>,
) -> Json<Vec<MetricSample>> {
    Json(state.aggregator.query(query).await.into_vec())
}

// ─── Tests ───────────────────────────────────────────────────────
