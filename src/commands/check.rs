//! Check Command
//!
//! Health check of the configured AI provider.

use clap::Args;
use tracing::{info, warn};

use drupal_agent_llm::{create_provider, LlmProvider, ProviderType};

use crate::models::{AgentConfig, CommandResponse, HealthResponse};
use crate::utils::error::AppResult;

/// Arguments of `check`
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Provider to check instead of the configured default
    #[arg(long)]
    pub provider: Option<String>,
}

/// Run the provider's health check.
pub async fn check_provider(provider: &dyn LlmProvider) -> CommandResponse<HealthResponse> {
    match provider.health_check().await {
        Ok(()) => {
            info!(provider = provider.name(), model = provider.model(), "provider healthy");
            CommandResponse::ok(HealthResponse::new(provider.name(), provider.model(), true))
        }
        Err(e) => {
            warn!(provider = provider.name(), error = %e, "provider health check failed");
            CommandResponse::failed(
                HealthResponse::new(provider.name(), provider.model(), false),
                e.to_string(),
            )
        }
    }
}

/// Run `check`. Returns whether the provider is healthy.
pub async fn execute(args: CheckArgs, config: &AgentConfig) -> AppResult<bool> {
    let provider_type = args
        .provider
        .as_deref()
        .map(str::parse::<ProviderType>)
        .transpose()?;

    let provider = create_provider(config.provider_config(provider_type)?)?;
    let response = check_provider(provider.as_ref()).await;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(response.success)
}
