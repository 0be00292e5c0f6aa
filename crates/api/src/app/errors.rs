use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use trivia_core::DomainError;
use trivia_infra::StoreError;

/// Description used for every not-found response (unknown route or record).
pub const NOT_FOUND_DESCRIPTION: &str = "404 Not Found: The requested URL was not found on the server. \
If you entered the URL manually please check your spelling and try again.";

pub const METHOD_NOT_ALLOWED_DESCRIPTION: &str =
    "405 Method Not Allowed: The method is not allowed for the requested URL.";

/// Every failure a handler can report. Rendered as the JSON error envelope.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    MethodNotAllowed(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    /// Accepted by validation, rejected by persistence.
    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound(NOT_FOUND_DESCRIPTION.to_string())
    }

    pub fn method_not_allowed() -> Self {
        Self::MethodNotAllowed(METHOD_NOT_ALLOWED_DESCRIPTION.to_string())
    }

    pub fn payload_too_large(msg: impl Into<String>) -> Self {
        Self::PayloadTooLarge(msg.into())
    }

    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self::Unprocessable(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The envelope's `message` field.
    pub fn category(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad request",
            ApiError::NotFound(_) => "not found",
            ApiError::MethodNotAllowed(_) => "method not allowed",
            ApiError::PayloadTooLarge(_) => "payload too large",
            ApiError::Unprocessable(_) => "unprocessable entity",
            ApiError::Internal(_) => "internal server error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!(%detail, "request failed");
        }
        json_error(self.status(), self.to_string(), self.category())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            // Ids and pages that cannot exist are just missing resources.
            DomainError::InvalidId(_) | DomainError::PageOutOfRange(_) => ApiError::not_found(),
        }
    }
}

pub fn json_error(
    status: StatusCode,
    error: impl Into<String>,
    message: &'static str,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "success": false,
            "error": error.into(),
            "message": message,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_failures_are_internal_errors() {
        let err = ApiError::from(StoreError::Database("boom".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.category(), "internal server error");
    }

    #[test]
    fn unparseable_ids_are_not_found() {
        let err = ApiError::from(DomainError::invalid_id("QuestionId: abc"));
        assert_eq!(err, ApiError::not_found());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_message_is_the_error_text() {
        let err = ApiError::bad_request("category_id is missing");
        assert_eq!(err.to_string(), "category_id is missing");
        assert_eq!(err.category(), "bad request");
    }
}
