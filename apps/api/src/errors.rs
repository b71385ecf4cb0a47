use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Typed errors of the merge engine. All of these are deterministic except
/// `Store`; the engine retries store conflicts internally and only surfaces
/// `StoreError::Unavailable` once the retry bound is exhausted.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("no profile exists for identity '{0}'")]
    UnknownIdentity(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("S3 error: {0}")]
    S3(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::InvalidIdentity(msg) => AppError::InvalidIdentity(msg),
            EngineError::UnknownIdentity(key) => {
                AppError::NotFound(format!("no profile exists for identity '{key}'"))
            }
            // A conflict that escapes the engine's retry loop is treated the
            // same as any other store failure.
            EngineError::Store(StoreError::Conflict(key)) => {
                AppError::StoreUnavailable(format!("persistent write conflict on '{key}'"))
            }
            EngineError::Store(StoreError::Unavailable(msg)) => AppError::StoreUnavailable(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidIdentity(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_IDENTITY", msg.clone())
            }
            AppError::StoreUnavailable(msg) => {
                tracing::error!("Store unavailable: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "STORE_UNAVAILABLE",
                    "The profile store is temporarily unavailable".to_string(),
                )
            }
            AppError::Extraction(msg) => {
                tracing::error!("Extraction error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXTRACTION_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::S3(msg) => {
                tracing::error!("S3 error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "S3_ERROR",
                    "A storage error occurred".to_string(),
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
