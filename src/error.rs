//! Errors surfaced to HTTP clients and the structured body they render as.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::lock::LockError;
use crate::session::SessionError;
use crate::store::StoreError;

pub const INTERNAL_MESSAGE: &str = "Internal Server Error";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Malformed input: bad JSON, unparseable numbers, unknown records.
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    /// Storage or other server-side failure. The message is client-facing.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Replace the client-facing message of an internal error, keeping the
    /// other variants as they are.
    pub fn or_internal(self, message: &str) -> Self {
        match self {
            ApiError::Internal(_) => ApiError::Internal(message.to_string()),
            other => other,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        error!(error = %err, "record store failure");
        ApiError::Internal(INTERNAL_MESSAGE.to_string())
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Validation(message) => ApiError::Validation(message),
            SessionError::NotFound(_) => ApiError::NotFound("Server not found.".to_string()),
            SessionError::Store(err) => err.into(),
        }
    }
}

impl From<LockError> for ApiError {
    fn from(err: LockError) -> Self {
        error!(error = %err, "account lock failure");
        ApiError::Internal(INTERNAL_MESSAGE.to_string())
    }
}

/// Error body returned for every failed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error_code: String,
    pub error_message: String,
    pub message_vars: Vec<String>,
    pub numeric_error_code: u32,
    pub originating_service: String,
    pub intent: String,
}

impl ErrorBody {
    pub fn new(
        status: StatusCode,
        url: &str,
        message: &str,
        timestamp: &str,
        originating_service: &str,
    ) -> Self {
        let (error_code, numeric_error_code) = error_code(status);
        Self {
            error_code: error_code.to_string(),
            error_message: message.to_string(),
            message_vars: vec![url.to_string(), timestamp.to_string()],
            numeric_error_code,
            originating_service: originating_service.to_string(),
            intent: "prod-live".to_string(),
        }
    }
}

fn error_code(status: StatusCode) -> (&'static str, u32) {
    match status {
        StatusCode::BAD_REQUEST => ("errors.com.epicgames.common.bad_request", 1001),
        StatusCode::UNAUTHORIZED => (
            "errors.com.epicgames.common.authentication.authentication_failed",
            1032,
        ),
        StatusCode::NOT_FOUND => ("errors.com.epicgames.common.not_found", 1004),
        _ => ("errors.com.epicgames.common.server_error", 1000),
    }
}

/// A rendered error: status plus structured body.
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ErrorResponse {
    pub fn new(err: &ApiError, url: &str, timestamp: &str, originating_service: &str) -> Self {
        let status = err.status_code();
        Self {
            status,
            body: ErrorBody::new(status, url, &err.to_string(), timestamp, originating_service),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
