//! Intent Parser
//!
//! Entry point of the intent layer. Applies the pattern table to the
//! normalized command, extracts template parameters on the first match and
//! otherwise hands the command to the generative fallback. `parse` always
//! produces exactly one `ParsedCommand`.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use drupal_agent_core::{CoreResult, ParseSource, ParsedCommand};

use super::extractor::extract_from_captures;
use super::fallback::{FallbackError, FallbackResolver};
use super::normalizer::normalize_command;
use super::patterns::PatternTable;

/// Natural-language command parser.
#[derive(Debug, Clone)]
pub struct IntentParser {
    table: Arc<PatternTable>,
    fallback: Option<FallbackResolver>,
}

impl IntentParser {
    /// Parser over `table` with no fallback; unmatched commands degrade.
    pub fn new(table: Arc<PatternTable>) -> Self {
        Self {
            table,
            fallback: None,
        }
    }

    /// Parser over the built-in rules.
    pub fn builtin() -> CoreResult<Self> {
        Ok(Self::new(Arc::new(PatternTable::builtin()?)))
    }

    /// Attach a generative fallback for commands no rule matches.
    pub fn with_fallback(mut self, resolver: FallbackResolver) -> Self {
        self.fallback = Some(resolver);
        self
    }

    pub fn table(&self) -> &Arc<PatternTable> {
        &self.table
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Pattern-only parse. `None` when no rule matches.
    pub fn match_rules(&self, text: &str) -> Option<ParsedCommand> {
        let normalized = normalize_command(text);
        self.match_normalized(&normalized)
    }

    fn match_normalized(&self, normalized: &str) -> Option<ParsedCommand> {
        let matched = self.table.find_match(normalized)?;
        let intent = matched.rule.intent();
        let template = matched.rule.template();

        debug!(
            rule = matched.index,
            intent = %intent,
            template = %template,
            "pattern rule matched"
        );

        let params = extract_from_captures(intent, template, &matched.captures, normalized);
        Some(ParsedCommand::new(
            intent,
            params,
            ParseSource::Pattern {
                rule: matched.index,
            },
        ))
    }

    /// Parse a command. Never fails: anything not understood becomes
    /// `unknown` with the normalized text under `raw_command`.
    pub async fn parse(&self, text: &str) -> ParsedCommand {
        let normalized = normalize_command(text);

        if let Some(command) = self.match_normalized(&normalized) {
            return command;
        }

        let Some(resolver) = &self.fallback else {
            info!(command = %normalized, "no pattern matched and no fallback configured");
            return ParsedCommand::unknown(normalized);
        };

        match resolver.resolve(&normalized).await {
            Ok(command) => {
                info!(
                    intent = %command.intent,
                    provider = resolver.provider_name(),
                    "command resolved by fallback"
                );
                command
            }
            Err(err) => {
                match &err {
                    FallbackError::Provider(e) => {
                        error!(error = %e, command = %normalized, "fallback provider call failed");
                    }
                    FallbackError::EmptyResponse
                    | FallbackError::Decode(_)
                    | FallbackError::UnknownIntent(_) => {
                        warn!(error = %err, command = %normalized, "fallback reply unusable");
                    }
                }
                ParsedCommand::unknown(normalized)
            }
        }
    }
}
