//! Error Handling
//!
//! Application-level error type for configuration and command handling.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

use drupal_agent_core::CoreError;
use drupal_agent_llm::LlmError;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML config file errors
    #[error("Config file error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Errors from the intent layer
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Errors from an LLM provider
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
