use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use redpen_blob::BlobError;
use redpen_engine::{EngineError, ErrorClass};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("blob error: {0}")]
    Blob(#[from] BlobError),

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("invalid request: {0}")]
    BadRequest(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    /// HTTP status plus the message surfaced to the caller.
    ///
    /// Server-side failures keep their detail in the logs and return a
    /// generic message; client errors are spelled out.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Engine(err) => match err.class() {
                ErrorClass::InputValidation => (StatusCode::BAD_REQUEST, err.to_string()),
                ErrorClass::Unauthenticated => (StatusCode::UNAUTHORIZED, err.to_string()),
                ErrorClass::Forbidden => (StatusCode::FORBIDDEN, err.to_string()),
                ErrorClass::NotFound => (StatusCode::NOT_FOUND, err.to_string()),
                ErrorClass::Conflict => (StatusCode::CONFLICT, err.to_string()),
                ErrorClass::Persistence => {
                    tracing::error!(error = %err, "persistence failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal error".to_string(),
                    )
                }
            },
            Self::Blob(err) => match err {
                BlobError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
                BlobError::Backend(_) => {
                    tracing::error!(error = %err, "blob backend failure");
                    (StatusCode::BAD_GATEWAY, "storage failure".to_string())
                }
                _ => (StatusCode::BAD_REQUEST, err.to_string()),
            },
            Self::AuthFailed(reason) => (StatusCode::UNAUTHORIZED, reason.clone()),
            Self::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => {
                tracing::error!(error = %self, "server failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(json!({ "error": message }))).into_response()
    }
}
