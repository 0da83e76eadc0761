//! API error handling
//!
//! Client errors carry their message. Server errors return a generic message;
//! the underlying cause is attached as `details` only when exposure is enabled.

use std::sync::atomic::{AtomicBool, Ordering};

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Whether 5xx responses include the error cause
static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(false);

/// Configure whether internal error details are included in responses
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::SeqCst);
}

fn should_expose_details() -> bool {
    EXPOSE_INTERNAL_ERRORS.load(Ordering::SeqCst)
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or invalid request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A processing call failed
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),

    /// A request inside a batch failed
    #[error("Batch processing failed in window {window_index}: {cause}")]
    BatchProcessingFailed { window_index: usize, cause: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Underlying cause, when exposed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// HTTP status of this error
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::ProcessingFailed(_)
            | Self::BatchProcessingFailed { .. }
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Response body, with or without the server-side cause
    pub fn body(&self, expose_details: bool) -> ErrorResponse {
        let (code, error, cause) = match self {
            Self::BadRequest(msg) => ("bad_request", msg.clone(), None),
            Self::ProcessingFailed(cause) => (
                "processing_failed",
                "Processing failed".to_string(),
                Some(cause),
            ),
            Self::BatchProcessingFailed {
                window_index,
                cause,
            } => (
                "batch_processing_failed",
                format!("Batch processing failed in window {window_index}"),
                Some(cause),
            ),
            Self::Internal(cause) => (
                "internal_error",
                "An internal error occurred".to_string(),
                Some(cause),
            ),
        };

        ErrorResponse {
            error,
            code: code.to_string(),
            details: cause.filter(|_| expose_details).cloned(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (status, Json(self.body(should_expose_details()))).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(e) => Self::BadRequest(e.to_string()),
            ApplicationError::ProcessingFailed(msg) | ApplicationError::Inference(msg) => {
                Self::ProcessingFailed(msg)
            },
            ApplicationError::BatchProcessingFailed {
                window_index,
                source,
            } => Self::BatchProcessingFailed {
                window_index,
                cause: source.to_string(),
            },
            ApplicationError::CacheUnavailable(msg)
            | ApplicationError::Cache(msg)
            | ApplicationError::Configuration(msg)
            | ApplicationError::Internal(msg) => Self::Internal(msg),
        }
    }
}
