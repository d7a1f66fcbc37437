//! Response Types
//!
//! JSON envelopes printed by the CLI commands.

use serde::{Deserialize, Serialize};

use drupal_agent_core::ParsedCommand;

use super::settings::AgentConfig;
use crate::services::intent::ExtractedParams;

/// Generic command response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> CommandResponse<T> {
    /// Create a successful response with data
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response with message
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Error response that still carries data
    pub fn failed(data: T, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Some(data),
            error: Some(message.into()),
        }
    }
}

impl<T> From<Result<T, crate::utils::error::AppError>> for CommandResponse<T> {
    fn from(result: Result<T, crate::utils::error::AppError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

/// Output of `parse`
#[derive(Debug, Clone, Serialize)]
pub struct ParseResponse {
    pub command: ParsedCommand,
    /// Second-stage parameters, absent when validation failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted: Option<ExtractedParams>,
    /// Example phrasings offered when the command was not understood
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

/// Output of `config`
#[derive(Debug, Clone, Serialize)]
pub struct ConfigResponse {
    /// Effective configuration with secrets masked
    pub config: AgentConfig,
    pub graphql_url: String,
    pub jsonapi_url: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_error: Option<String>,
}

/// Output of `check`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub provider: String,
    pub model: String,
}

impl HealthResponse {
    pub fn new(provider: impl Into<String>, model: impl Into<String>, healthy: bool) -> Self {
        Self {
            status: if healthy { "healthy" } else { "unavailable" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            provider: provider.into(),
            model: model.into(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
