//! HTTP error responses.

use axum::{http::StatusCode, response::IntoResponse, Json};
use tracing::error;

/// Errors returned by handlers, rendered as `{"error": message}`.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(libris_core::Error),
}

impl From<libris_core::Error> for ApiError {
    fn from(err: libris_core::Error) -> Self {
        match err {
            libris_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(err) => {
                // Storage errors stay in the log; clients get a fixed message.
                error!(
                    subsystem = "api",
                    error = %err,
                    "Request failed"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
