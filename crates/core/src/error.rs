//! Core Error Types
//!
//! Defines the error types used across the Drupal Agent workspace. These are
//! dependency-free (only thiserror + serde_json + std) to keep the core crate
//! lightweight.
//!
//! Parameter-level failures (`MissingParameter`, `InvalidParameter`) are the
//! caller-visible errors of the extraction layer. A command that simply is
//! not understood never produces a `CoreError`; it degrades to the `unknown`
//! intent instead.

use thiserror::Error;

/// Core error type for the Drupal Agent workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required parameter was absent
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    /// A parameter was present but malformed
    #[error("Invalid parameter '{field}': {message}")]
    InvalidParameter { field: String, message: String },

    /// A pattern rule paired an intent with a template it does not own
    #[error("Unrecognized template '{template}' for intent '{intent}'")]
    UnrecognizedTemplate { intent: String, template: String },

    /// A rule pattern failed to compile
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a missing parameter error
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingParameter(field.into())
    }

    /// Create an invalid parameter error
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a pattern error
    pub fn pattern(msg: impl Into<String>) -> Self {
        Self::Pattern(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error came from parameter validation.
    pub fn is_parameter_error(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter(_) | Self::InvalidParameter { .. }
        )
    }
}

/// Convert CoreError to a string
impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::config("invalid setting");
        assert_eq!(err.to_string(), "Configuration error: invalid setting");
    }

    #[test]
    fn test_error_conversion() {
        let err = CoreError::config("invalid setting");
        let msg: String = err.into();
        assert!(msg.contains("Configuration error"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let core_err: CoreError = io_err.into();
        assert!(matches!(core_err, CoreError::Io(_)));
    }

    #[test]
    fn test_missing_parameter_error() {
        let err = CoreError::missing("file_path");
        assert_eq!(err.to_string(), "Missing required parameter: file_path");
        assert!(err.is_parameter_error());
    }

    #[test]
    fn test_invalid_parameter_error() {
        let err = CoreError::invalid("node_id", "not a number: abc");
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'node_id': not a number: abc"
        );
        assert!(err.is_parameter_error());
    }

    #[test]
    fn test_unrecognized_template_error() {
        let err = CoreError::UnrecognizedTemplate {
            intent: "delete-node".to_string(),
            template: "topic".to_string(),
        };
        assert!(err.to_string().contains("'topic'"));
        assert!(!err.is_parameter_error());
    }

    #[test]
    fn test_internal_error() {
        let err = CoreError::internal("lock poisoned");
        assert_eq!(err.to_string(), "Internal error: lock poisoned");
    }
}
