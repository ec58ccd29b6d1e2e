//! Error types for the progress API.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mealtrack_client::MealStoreError;
use serde_json::json;
use thiserror::Error;

/// Progress API errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("store error: {0}")]
    Store(#[from] MealStoreError),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Store(MealStoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::BAD_GATEWAY,
            ApiError::Serialization(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "INVALID_REQUEST",
            ApiError::Auth(_) => "INVALID_TOKEN",
            ApiError::Store(MealStoreError::NotFound(_)) => "NOT_FOUND",
            ApiError::Store(_) => "UPSTREAM",
            ApiError::Serialization(_) | ApiError::Internal(_) => "ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        });
        (self.status_code(), Json(body)).into_response()
    }
}

/// Result type alias for progress API operations.
pub type ApiResult<T> = Result<T, ApiError>;
