//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A required request field is missing or malformed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The requested processing type is not known
    #[error("Unsupported processing type: {0}")]
    UnsupportedType(String),
}

impl DomainError {
    /// Create an invalid request error for a missing field
    pub fn missing_field(field: &str) -> Self {
        Self::InvalidRequest(format!("'{field}' is required"))
    }

    /// Whether this error was caused by the client
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest(_) | Self::UnsupportedType(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_message() {
        let err = DomainError::missing_field("content");
        assert_eq!(err.to_string(), "Invalid request: 'content' is required");
    }

    #[test]
    fn unsupported_type_message() {
        let err = DomainError::UnsupportedType("unknown".to_string());
        assert_eq!(err.to_string(), "Unsupported processing type: unknown");
    }

    #[test]
    fn all_domain_errors_are_client_errors() {
        assert!(DomainError::missing_field("type").is_client_error());
        assert!(DomainError::UnsupportedType("x".to_string()).is_client_error());
    }
}
