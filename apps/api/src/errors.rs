use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::failure::{AnalysisFailure, FailureKind};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Model call failed: {0}")]
    Analysis(#[from] AnalysisFailure),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Analysis(failure) => {
                tracing::error!("Model call failed: {failure}");
                let status = match failure.kind() {
                    FailureKind::AuthFailure | FailureKind::Unknown => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                    FailureKind::NetworkFailure | FailureKind::SchemaViolation => {
                        StatusCode::BAD_GATEWAY
                    }
                };
                (
                    status,
                    failure.kind().as_str(),
                    failure.user_message().to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
