//! Error types for citelink-api

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Backing document missing (404)
    #[error("File not found")]
    NotFound,

    /// Backing document unparseable (500)
    #[error("Invalid JSON data")]
    MalformedInput,

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<citelink_common::Error> for ApiError {
    fn from(err: citelink_common::Error) -> Self {
        match err {
            citelink_common::Error::NotFound(path) => {
                error!("Document not found: {}", path);
                ApiError::NotFound
            }
            citelink_common::Error::Malformed(e) => {
                error!("Document is not valid content JSON: {}", e);
                ApiError::MalformedInput
            }
            other => {
                error!("Failed to load document: {}", other);
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::MalformedInput => (StatusCode::INTERNAL_SERVER_ERROR, "MALFORMED_INPUT"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
