//! Generative Fallback
//!
//! Resolves commands the pattern table does not recognize by asking an LLM
//! provider for an `{intent, params}` JSON object. A single request is made;
//! every failure mode is reported as a distinct `FallbackError` and the
//! parser decides how to degrade.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use drupal_agent_core::{Intent, ParseSource, ParsedCommand, Params};
use drupal_agent_llm::{LlmError, LlmProvider, LlmRequestOptions, Message};

// ============================================================================
// Prompt
// ============================================================================

const FALLBACK_SYSTEM_PROMPT: &str = "You translate Drupal site management commands into structured JSON. \
Respond with ONLY a single JSON object with the keys \"intent\" and \"params\". \
No markdown fences, no explanatory text.";

/// Worked examples embedded in every fallback prompt.
const FALLBACK_EXAMPLES: [(&str, &str); 6] = [
    (
        "Create blog about AI",
        r#"{"intent": "create-post", "params": {"topic": "AI"}}"#,
    ),
    (
        "Clear cache",
        r#"{"intent": "run-drush", "params": {"command": "cache:clear"}}"#,
    ),
    (
        "Show latest 5 posts",
        r#"{"intent": "query-graphql", "params": {"query_type": "latest_nodes", "content_type": "article", "limit": 5}}"#,
    ),
    (
        "Start test-blog site",
        r#"{"intent": "start-site", "params": {"project_name": "test-blog"}}"#,
    ),
    (
        "Stop my-site",
        r#"{"intent": "stop-site", "params": {"project_name": "my-site"}}"#,
    ),
    (
        "Status of blog-site",
        r#"{"intent": "status-site", "params": {"project_name": "blog-site"}}"#,
    ),
];

/// Build the user prompt for one command.
pub fn build_fallback_prompt(command: &str) -> String {
    let vocabulary = Intent::ALL
        .iter()
        .map(Intent::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt = format!(
        "Parse this Drupal management command into a structured format:\n\
         Command: \"{}\"\n\n\
         Return JSON with:\n\
         - \"intent\": one of [{}]\n\
         - \"params\": object with relevant parameters\n\n\
         Examples:\n",
        command, vocabulary
    );
    for (example, reply) in FALLBACK_EXAMPLES {
        prompt.push_str(&format!("\"{}\" -> {}\n", example, reply));
    }
    prompt
}

// ============================================================================
// Errors
// ============================================================================

/// Why the fallback could not produce a command.
#[derive(Error, Debug)]
pub enum FallbackError {
    /// The provider call itself failed
    #[error("provider call failed: {0}")]
    Provider(#[from] LlmError),

    /// The provider answered with no text
    #[error("provider returned an empty response")]
    EmptyResponse,

    /// The reply was not a usable `{intent, params}` object
    #[error("could not decode fallback reply: {0}")]
    Decode(String),

    /// The reply named an intent outside the vocabulary
    #[error("fallback reply used unknown intent '{0}'")]
    UnknownIntent(String),
}

// ============================================================================
// Decoding
// ============================================================================

/// Locate the JSON object in a model reply: fenced block first, then the
/// outermost braces, else the trimmed text as is.
pub fn extract_json_from_response(response_text: &str) -> &str {
    let trimmed = response_text.trim();

    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        let content_start = after_fence.find('\n').map(|nl| nl + 1).unwrap_or(0);
        let content = &after_fence[content_start..];
        if let Some(end) = content.find("```") {
            return content[..end].trim();
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start <= end {
            return &trimmed[start..=end];
        }
    }

    trimmed
}

/// Decode a reply into a `ParsedCommand` sourced from the fallback.
pub fn decode_fallback_reply(reply: &str, command: &str) -> Result<ParsedCommand, FallbackError> {
    let json_str = extract_json_from_response(reply);

    let value: Value = serde_json::from_str(json_str).map_err(|e| {
        FallbackError::Decode(format!(
            "{} (reply starts with: {:?})",
            e,
            reply.chars().take(100).collect::<String>()
        ))
    })?;

    let Value::Object(mut object) = value else {
        return Err(FallbackError::Decode("reply is not a JSON object".to_string()));
    };

    let intent_name = match object.remove("intent") {
        Some(Value::String(name)) => name,
        Some(other) => {
            return Err(FallbackError::Decode(format!("\"intent\" is not a string: {}", other)))
        }
        None => return Err(FallbackError::Decode("missing \"intent\" key".to_string())),
    };

    let intent: Intent = intent_name
        .parse()
        .map_err(|_| FallbackError::UnknownIntent(intent_name.clone()))?;

    let mut params: Params = match object.remove("params") {
        None | Some(Value::Null) => Params::new(),
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(FallbackError::Decode(format!("\"params\" is not an object: {}", other)))
        }
    };

    if intent == Intent::Unknown && !params.contains_key("raw_command") {
        params.insert("raw_command".to_string(), Value::String(command.to_string()));
    }

    Ok(ParsedCommand::new(intent, params, ParseSource::Fallback))
}

// ============================================================================
// Resolver
// ============================================================================

/// Asks an LLM provider to classify commands the pattern table missed.
#[derive(Clone)]
pub struct FallbackResolver {
    provider: Arc<dyn LlmProvider>,
}

impl FallbackResolver {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Name of the provider behind this resolver.
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Make exactly one provider request for `command` and decode the reply.
    pub async fn resolve(&self, command: &str) -> Result<ParsedCommand, FallbackError> {
        let messages = vec![Message::user(build_fallback_prompt(command))];
        let options = LlmRequestOptions {
            json_output: true,
            ..Default::default()
        };

        debug!(
            provider = self.provider.name(),
            model = self.provider.model(),
            "resolving command through generative fallback"
        );

        let response = self
            .provider
            .send_message(messages, Some(FALLBACK_SYSTEM_PROMPT.to_string()), options)
            .await?;

        let reply = response.text_content().ok_or(FallbackError::EmptyResponse)?;
        decode_fallback_reply(reply, command)
    }
}

impl std::fmt::Debug for FallbackResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackResolver")
            .field("provider", &self.provider.name())
            .field("model", &self.provider.model())
            .finish()
    }
}
