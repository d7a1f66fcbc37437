//! Parse Command
//!
//! Runs one natural-language command through the intent parser and the
//! second-stage extractor and prints the result as JSON.

use clap::Args;
use serde_json::Value;
use tracing::{debug, warn};

use drupal_agent_core::Intent;
use drupal_agent_llm::{create_provider, ProviderType};

use crate::models::{AgentConfig, CommandResponse, ParseResponse};
use crate::services::intent::{extract_for_intent, FallbackResolver, IntentParser};
use crate::utils::error::AppResult;

/// Phrasings offered when a command is not understood.
pub const SUGGESTIONS: [&str; 5] = [
    "Try: 'create post about X'",
    "Try: 'clear cache'",
    "Try: 'show latest 10 posts'",
    "Try: 'get users with role editor'",
    "Try: 'create site named mysite'",
];

/// Arguments of `parse`
#[derive(Debug, Args)]
pub struct ParseArgs {
    /// The command, e.g. "create a blog post about AI in Drupal"
    #[arg(required = true, num_args = 1..)]
    pub command: Vec<String>,

    /// Match against the rule table only
    #[arg(long)]
    pub no_fallback: bool,

    /// Provider recorded on create-post results (ollama, openai, anthropic)
    #[arg(long)]
    pub ai_provider: Option<String>,
}

/// Build the parser, attaching the configured provider as fallback.
///
/// A provider that cannot be constructed leaves the parser pattern-only.
pub fn build_parser(config: &AgentConfig, no_fallback: bool) -> AppResult<IntentParser> {
    let parser = IntentParser::builtin()?;
    if no_fallback {
        return Ok(parser);
    }

    let provider_config = config.provider_config(None)?;
    let has_key = provider_config
        .api_key
        .as_deref()
        .is_some_and(|k| !k.trim().is_empty());
    if provider_config.provider.requires_api_key() && !has_key {
        warn!(
            provider = %provider_config.provider,
            "no API key configured, using pattern rules only"
        );
        return Ok(parser);
    }

    match create_provider(provider_config) {
        Ok(provider) => {
            debug!(provider = provider.name(), model = provider.model(), "fallback enabled");
            Ok(parser.with_fallback(FallbackResolver::new(provider)))
        }
        Err(e) => {
            warn!(error = %e, "fallback provider unavailable, using pattern rules only");
            Ok(parser)
        }
    }
}

/// Parse `text` and validate its parameters.
///
/// Parameter-validation failures yield an unsuccessful response carrying the
/// parsed command; they are not returned as `Err`.
pub async fn parse_command(
    parser: &IntentParser,
    text: &str,
    ai_provider: Option<ProviderType>,
) -> AppResult<CommandResponse<ParseResponse>> {
    let mut command = parser.parse(text).await;

    if let (Some(provider), Intent::CreatePost) = (ai_provider, command.intent) {
        command
            .params
            .insert("ai_provider".to_string(), Value::String(provider.to_string()));
    }

    let suggestions = if command.is_unknown() {
        SUGGESTIONS.iter().map(|s| s.to_string()).collect()
    } else {
        Vec::new()
    };

    match extract_for_intent(command.intent, &command.params) {
        Ok(extracted) => Ok(CommandResponse::ok(ParseResponse {
            command,
            extracted: Some(extracted),
            suggestions,
        })),
        Err(e) if e.is_parameter_error() => {
            let message = e.to_string();
            Ok(CommandResponse::failed(
                ParseResponse {
                    command,
                    extracted: None,
                    suggestions,
                },
                message,
            ))
        }
        Err(e) => Err(e.into()),
    }
}

/// Run `parse`. Returns whether the command validated.
pub async fn execute(args: ParseArgs, config: &AgentConfig) -> AppResult<bool> {
    let ai_provider = args
        .ai_provider
        .as_deref()
        .map(str::parse::<ProviderType>)
        .transpose()?;

    let parser = build_parser(config, args.no_fallback)?;
    let text = args.command.join(" ");
    let response = parse_command(&parser, &text, ai_provider).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(response.success)
}
