//! # HTTP Errors
//!
//! Error types for the HTTP surface. Every variant renders as
//! `{"error": "...", "code": <status>}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::schema::ValidationErrors;

/// Result type for HTTP operations
pub type HttpResult<T> = Result<T, HttpError>;

/// HTTP errors
#[derive(Debug, Error)]
pub enum HttpError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Request data rejected by its schema
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Body is not a JSON object
    #[error("{0}")]
    InvalidBody(String),

    /// Query string could not be decoded
    #[error("Invalid query string: {0}")]
    InvalidQuery(String),

    /// Path parameters could not be decoded
    #[error("Invalid path parameters: {0}")]
    InvalidParams(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Unexpected failure while handling a request
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HttpError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            HttpError::Validation(_) => StatusCode::BAD_REQUEST,
            HttpError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            HttpError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            HttpError::InvalidParams(_) => StatusCode::BAD_REQUEST,
            HttpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<HttpError> for ErrorResponse {
    fn from(err: HttpError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorResponse::from(self))).into_response()
    }
}
