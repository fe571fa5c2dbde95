//! Error types for orill-il HTTP handlers

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// orill-common error; status depends on the variant
    #[error(transparent)]
    Common(#[from] orill_common::Error),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str) {
        use orill_common::Error as E;

        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Common(err) => match err {
                E::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
                E::AnalyzerFault { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "ANALYZER_FAULT"),
                E::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
                E::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            },
        }
    }

    /// Storage failures; resubmitting the request may succeed
    fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Common(err) if err.is_transient())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.parts();
        let message = match &self {
            ApiError::BadRequest(msg) | ApiError::Internal(msg) => msg.clone(),
            ApiError::Common(err) => err.to_string(),
        };

        if status.is_server_error() {
            tracing::error!(
                code = error_code,
                retryable = self.is_retryable(),
                error = %message,
                "Request failed"
            );
        }

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
