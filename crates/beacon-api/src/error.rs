//! Error types for the gateway's HTTP surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while handling a gateway request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input: missing/invalid required fields or a bad header.
    #[error("{0}")]
    Validation(String),

    /// The caller could not be authenticated.
    #[error("{0}")]
    Unauthorized(String),

    /// The caller is authenticated but the tenant may not act.
    #[error("{0}")]
    Forbidden(String),

    /// The request's target does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Database error.
    #[error(transparent)]
    Database(#[from] beacon_db::DbError),

    /// Client build or delivery failure.
    #[error(transparent)]
    Push(#[from] beacon_push::PushError),
}

/// Error response format for API errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ApiError {
    /// The HTTP status this error maps to.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Push(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_code, message) = match &self {
            ApiError::Validation(msg) => ("validation_error", msg.clone()),
            ApiError::Unauthorized(msg) => ("unauthorized", msg.clone()),
            ApiError::Forbidden(msg) => ("forbidden", msg.clone()),
            ApiError::NotFound(msg) => ("not_found", msg.clone()),
            ApiError::Database(err) => {
                tracing::error!(error = %err, "Database error while handling request");
                ("internal_error", "An unexpected error occurred".to_string())
            }
            ApiError::Push(err) => {
                tracing::error!(error = %err, "Push failure while handling request");
                (
                    "push_failed",
                    "Failed to send push notification".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: error_code.to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
