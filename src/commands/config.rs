//! Config Command
//!
//! Prints the effective configuration with secrets masked.

use crate::models::{AgentConfig, CommandResponse, ConfigResponse};
use crate::utils::error::AppResult;

/// Describe `config` and its validation result.
pub fn describe(config: &AgentConfig) -> ConfigResponse {
    let validation_error = config.validate().err().map(|e| e.to_string());
    ConfigResponse {
        config: config.redacted(),
        graphql_url: config.graphql_url(),
        jsonapi_url: config.jsonapi_url(),
        valid: validation_error.is_none(),
        validation_error,
    }
}

/// Run `config`. Returns whether the configuration is valid.
pub fn execute(config: &AgentConfig) -> AppResult<bool> {
    let description = describe(config);
    let response = match description.validation_error.clone() {
        Some(message) => CommandResponse::failed(description, message),
        None => CommandResponse::ok(description),
    };
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(response.success)
}
