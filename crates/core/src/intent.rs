//! Intent Vocabulary
//!
//! The closed set of actions a command can resolve to, the parameter mapping
//! that travels with it, and the parser output consumed by the dispatch layer.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;

/// Parameter mapping attached to an intent.
///
/// Values are strings, integers, string lists or nested mappings; the key
/// vocabulary depends on the intent.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Operator intents understood by the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Intent {
    /// Create an article or blog post
    CreatePost,
    /// Update fields of an existing node
    EditNode,
    /// Delete a node
    DeleteNode,
    /// Upload a media file
    UploadMedia,
    /// Run a drush maintenance command
    RunDrush,
    /// Query content or users through GraphQL
    QueryGraphql,
    /// Provision a local development site
    CreateSite,
    /// Start a local site
    StartSite,
    /// Stop a local site
    StopSite,
    /// Restart a local site
    RestartSite,
    /// Report the status of a local site
    StatusSite,
    /// The command was not understood
    Unknown,
}

impl Intent {
    /// Every intent, in vocabulary order.
    pub const ALL: [Intent; 12] = [
        Intent::CreatePost,
        Intent::EditNode,
        Intent::DeleteNode,
        Intent::UploadMedia,
        Intent::RunDrush,
        Intent::QueryGraphql,
        Intent::CreateSite,
        Intent::StartSite,
        Intent::StopSite,
        Intent::RestartSite,
        Intent::StatusSite,
        Intent::Unknown,
    ];

    /// Wire identifier of the intent.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::CreatePost => "create-post",
            Intent::EditNode => "edit-node",
            Intent::DeleteNode => "delete-node",
            Intent::UploadMedia => "upload-media",
            Intent::RunDrush => "run-drush",
            Intent::QueryGraphql => "query-graphql",
            Intent::CreateSite => "create-site",
            Intent::StartSite => "start-site",
            Intent::StopSite => "stop-site",
            Intent::RestartSite => "restart-site",
            Intent::StatusSite => "status-site",
            Intent::Unknown => "unknown",
        }
    }

    /// Whether this intent manages an existing local site.
    pub fn is_site_lifecycle(&self) -> bool {
        matches!(
            self,
            Intent::StartSite | Intent::StopSite | Intent::RestartSite | Intent::StatusSite
        )
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Intent::ALL
            .into_iter()
            .find(|intent| intent.as_str() == wanted)
            .ok_or_else(|| CoreError::validation(format!("Unknown intent: {}", s)))
    }
}

/// How a `ParsedCommand` was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseSource {
    /// Matched the pattern rule at this table index
    Pattern { rule: usize },
    /// Resolved by the generative fallback
    Fallback,
    /// Nothing understood the command
    Degraded,
}

/// The single result of parsing one operator command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedCommand {
    pub intent: Intent,
    pub params: Params,
    pub source: ParseSource,
}

impl ParsedCommand {
    /// Create a parsed command
    pub fn new(intent: Intent, params: Params, source: ParseSource) -> Self {
        Self {
            intent,
            params,
            source,
        }
    }

    /// The degraded result: `unknown` with the command text preserved.
    pub fn unknown(raw_command: impl Into<String>) -> Self {
        let mut params = Params::new();
        params.insert(
            "raw_command".to_string(),
            serde_json::Value::String(raw_command.into()),
        );
        Self::new(Intent::Unknown, params, ParseSource::Degraded)
    }

    /// Whether the command was understood.
    pub fn is_unknown(&self) -> bool {
        self.intent == Intent::Unknown
    }

    /// Look up a string parameter.
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(|v| v.as_str())
    }

    /// Look up an integer parameter.
    pub fn param_i64(&self, key: &str) -> Option<i64> {
        self.params.get(key).and_then(|v| v.as_i64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_round_trips_through_str() {
        for intent in Intent::ALL {
            let parsed: Intent = intent.as_str().parse().unwrap();
            assert_eq!(parsed, intent);
        }
    }

    #[test]
    fn test_intent_serde_matches_as_str() {
        for intent in Intent::ALL {
            let json = serde_json::to_string(&intent).unwrap();
            assert_eq!(json, format!("\"{}\"", intent.as_str()));
        }
    }

    #[test]
    fn test_intent_from_str_is_case_insensitive() {
        assert_eq!("Run-Drush".parse::<Intent>().unwrap(), Intent::RunDrush);
        assert_eq!(" status-site ".parse::<Intent>().unwrap(), Intent::StatusSite);
    }

    #[test]
    fn test_intent_from_str_rejects_other_vocabularies() {
        assert!("query-nodes".parse::<Intent>().is_err());
        assert!("query-users".parse::<Intent>().is_err());
        assert!("".parse::<Intent>().is_err());
    }

    #[test]
    fn test_site_lifecycle() {
        assert!(Intent::RestartSite.is_site_lifecycle());
        assert!(!Intent::CreateSite.is_site_lifecycle());
    }

    #[test]
    fn test_unknown_command_keeps_raw_text() {
        let cmd = ParsedCommand::unknown("do something odd");
        assert!(cmd.is_unknown());
        assert_eq!(cmd.source, ParseSource::Degraded);
        assert_eq!(cmd.param_str("raw_command"), Some("do something odd"));
        assert_eq!(cmd.params.len(), 1);
    }

    #[test]
    fn test_parsed_command_serialization() {
        let mut params = Params::new();
        params.insert("node_id".to_string(), serde_json::json!(45));
        let cmd = ParsedCommand::new(Intent::DeleteNode, params, ParseSource::Pattern { rule: 5 });

        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["intent"], "delete-node");
        assert_eq!(json["params"]["node_id"], 45);
        assert_eq!(json["source"]["kind"], "pattern");
        assert_eq!(cmd.param_i64("node_id"), Some(45));
    }
}
