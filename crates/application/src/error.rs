//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error (invalid request, unsupported type)
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Inference/AI backend error
    #[error("Inference error: {0}")]
    Inference(String),

    /// A processing transform or its model call failed
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),

    /// A request inside a batch window failed
    #[error("Batch processing failed in window {window_index}: {source}")]
    BatchProcessingFailed {
        /// Zero-based index of the failing window
        window_index: usize,
        /// The failure of the first failing request in that window
        #[source]
        source: Box<ApplicationError>,
    },

    /// Cache backend is not connected
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    /// Cache backend reported an error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error was caused by the client's input
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Domain(_))
    }

    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Inference(_) | Self::CacheUnavailable(_))
    }

    /// Wrap a failure from the given batch window
    pub fn in_batch_window(window_index: usize, source: Self) -> Self {
        Self::BatchProcessingFailed {
            window_index,
            source: Box::new(source),
        }
    }
}
