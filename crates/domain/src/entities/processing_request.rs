//! Processing request entity

use serde::{Deserialize, Serialize};

use crate::{
    errors::DomainError,
    value_objects::{ProcessingOptions, ProcessingType},
};

/// A content processing request as submitted by a client
///
/// The `type` is kept as the raw string the client sent so that an unknown
/// type can be reported as [`DomainError::UnsupportedType`] rather than a
/// deserialization failure. Missing fields deserialize to empty values and
/// are rejected by [`ProcessingRequest::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingRequest {
    /// Requested processing type (wire name)
    #[serde(rename = "type", default)]
    pub processing_type: String,
    /// Content to process
    #[serde(default)]
    pub content: String,
    /// Operation-specific options
    #[serde(default)]
    pub options: ProcessingOptions,
}

impl ProcessingRequest {
    /// Create a request for a known processing type
    pub fn new(processing_type: ProcessingType, content: impl Into<String>) -> Self {
        Self {
            processing_type: processing_type.as_str().to_string(),
            content: content.into(),
            options: ProcessingOptions::new(),
        }
    }

    /// Create a request from a raw type name
    pub fn from_raw(processing_type: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            processing_type: processing_type.into(),
            content: content.into(),
            options: ProcessingOptions::new(),
        }
    }

    /// Attach options
    #[must_use]
    pub fn with_options(mut self, options: ProcessingOptions) -> Self {
        self.options = options;
        self
    }

    /// Validate required fields and resolve the processing type
    ///
    /// `type` and `content` must both be present and not blank. Presence is
    /// checked before the type is resolved, so a request missing its content
    /// is always an invalid request even when its type is unknown.
    pub fn validate(&self) -> Result<ProcessingType, DomainError> {
        if self.processing_type.trim().is_empty() {
            return Err(DomainError::missing_field("type"));
        }
        if self.content.trim().is_empty() {
            return Err(DomainError::missing_field("content"));
        }
        self.processing_type.parse()
    }
}
