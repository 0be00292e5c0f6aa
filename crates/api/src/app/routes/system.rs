use axum::http::StatusCode;

use crate::app::errors::ApiError;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Fallback for paths no route matches.
pub async fn not_found() -> ApiError {
    ApiError::not_found()
}
