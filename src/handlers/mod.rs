pub mod metrics;
pub mod status;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::Error;

// ─── Unified error type ──────────────────────────────────────────

/// Boundary-level error. Writes either succeed with an id or collapse to
/// the single "could not write" condition; per-store outcomes are never
/// reported to the caller.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    WriteUnavailable,
    Internal(String),
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        match err {
            Error::WriteTimeout(_) => Self::WriteUnavailable,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::WriteUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "could not write metric".into(),
            ),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({
            "error":  message,
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}
