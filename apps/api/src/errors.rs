use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Per-request error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid asset format: {0}")]
    InvalidAssetFormat(String),

    #[error("Storage failure at {}: {source}", .path.display())]
    StorageFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Generation service error: {0}")]
    GenerationService(#[from] LlmError),

    #[error("Render failure: {0}")]
    RenderFailure(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::InvalidAssetFormat(msg) => {
                tracing::warn!("Invalid asset format: {msg}");
                (
                    StatusCode::BAD_REQUEST,
                    "INVALID_ASSET_FORMAT",
                    format!("The photo could not be read: {msg}"),
                )
            }
            AppError::StorageFailure { path, source } => {
                tracing::error!("Storage failure at {}: {source}", path.display());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_FAILURE",
                    "The photo could not be stored".to_string(),
                )
            }
            AppError::GenerationService(e) => {
                tracing::error!("Generation service error: {e}");
                let status = if matches!(e, LlmError::Timeout(_)) {
                    StatusCode::GATEWAY_TIMEOUT
                } else {
                    StatusCode::BAD_GATEWAY
                };
                (
                    status,
                    "GENERATION_SERVICE_ERROR",
                    format!("Summary generation failed: {e}"),
                )
            }
            AppError::RenderFailure(msg) => {
                tracing::error!("Render failure: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RENDER_FAILURE",
                    format!("The document could not be rendered: {msg}"),
                )
            }
            AppError::Validation(msg) => {
                tracing::warn!("Validation error: {msg}");
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::NotFound(msg) => {
                tracing::warn!("Not found: {msg}");
                (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone())
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
