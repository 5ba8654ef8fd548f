//! # API Error Types
//!
//! The single failure channel of the HTTP layer. Every handler error,
//! including schema validation failures, becomes an [`AppError`] and is
//! rendered as:
//!
//! ```json
//! {"error": {"code": 100, "message": "validate error", "data": [ ... ]}}
//! ```
//!
//! Validation failures carry the configured failure code and status
//! (422 when none is configured) plus every violation. Other errors use
//! the HTTP status as their code. Internal errors never expose details.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vgate_schema::{DispatchError, ValidationFailure};

/// Status used for validation failures without a configured override.
pub const DEFAULT_FAIL_STATUS: StatusCode = StatusCode::UNPROCESSABLE_ENTITY;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Numeric error code: the configured failure code for validation
    /// failures, the HTTP status otherwise.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Violation list for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Request data failed schema validation.
    #[error(transparent)]
    Fail(#[from] ValidationFailure),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status for this error.
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Fail(failure) => failure
                .status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(DEFAULT_FAIL_STATUS),
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let detail = match self {
            Self::Fail(failure) => ErrorDetail {
                code: failure.code,
                message: failure.message,
                data: serde_json::to_value(failure.errors).ok(),
            },
            Self::Internal(reason) => {
                tracing::error!(error = %reason, "internal server error");
                ErrorDetail {
                    code: u32::from(status.as_u16()),
                    message: "An internal error occurred".to_string(),
                    data: None,
                }
            }
            other => ErrorDetail {
                code: u32::from(status.as_u16()),
                message: other.to_string(),
                data: None,
            },
        };

        (status, Json(ErrorBody { error: detail })).into_response()
    }
}

/// A reference to an unregistered schema or an uncompilable inline schema
/// is a server-side defect, not a client error.
impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Failed(failure) => Self::Fail(failure),
            other => Self::Internal(other.to_string()),
        }
    }
}
