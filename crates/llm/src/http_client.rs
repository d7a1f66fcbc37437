//! HTTP Client Factory
//!
//! Builds the reqwest client every provider uses, with the request timeout
//! applied at the client level.

use std::time::Duration;

use crate::types::{LlmError, LlmResult};

/// Build a `reqwest::Client` bounded by `timeout`.
///
/// Proxy settings are taken from the environment, as reqwest does by default.
pub fn build_http_client(timeout: Duration) -> LlmResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Other {
            message: format!("failed to build HTTP client: {}", e),
        })
}
