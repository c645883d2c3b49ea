//! Custom error types for the API service
//!
//! Every failure is translated to the response envelope at the request
//! boundary. Raw internal detail travels only in the `error` field; the
//! `message` is always safe to show a user.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    /// Duplicate resource, such as an already-registered email
    #[error("{0}")]
    Conflict(String),

    /// Missing, invalid, or expired credential
    #[error("{0}")]
    Unauthorized(String),

    /// Valid credential but insufficient role, deactivated account, or a
    /// stale rotated refresh token
    #[error("{0}")]
    Forbidden(String),

    /// Referenced entity absent
    #[error("{0}")]
    NotFound(String),

    /// Unexpected failure in hashing, persistence, or token signing.
    /// Rendered as a generic message; the detail goes to the `error` field.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (message, detail) = match &self {
            ApiError::Internal(source) => {
                tracing::error!("Internal error: {:#}", source);
                ("Internal server error".to_string(), Some(source.to_string()))
            }
            other => (other.to_string(), None),
        };

        let mut body = json!({
            "success": false,
            "message": message,
        });
        if let Some(detail) = detail {
            body["error"] = json!(detail);
        }

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
