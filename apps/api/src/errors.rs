use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::audit::extraction::ExtractionError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Malformed extraction: {0}")]
    MalformedExtraction(String),

    #[error("Invalid signals: {0}")]
    InvalidSignals(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ExtractionError> for AppError {
    fn from(e: ExtractionError) -> Self {
        match e {
            ExtractionError::MalformedExtraction(msg) => AppError::MalformedExtraction(msg),
            ExtractionError::InvalidSignals(msg) => AppError::InvalidSignals(msg),
        }
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::UnsupportedMedia(mime) => {
                AppError::Validation(format!("unsupported document type '{mime}'"))
            }
            other => AppError::Llm(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::MalformedExtraction(msg) => {
                tracing::warn!("Malformed extraction: {msg}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "MALFORMED_EXTRACTION",
                    format!("The document could not be audited: {msg}"),
                )
            }
            AppError::InvalidSignals(msg) => {
                tracing::warn!("Invalid signals: {msg}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "INVALID_SIGNALS",
                    format!("The extracted signals are invalid: {msg}"),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
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
