//! Fallback Integration Tests
//!
//! Unmatched commands routed through a mock provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use drupal_agent::services::intent::{FallbackResolver, IntentParser};
use drupal_agent_core::{Intent, ParseSource};
use drupal_agent_llm::{
    LlmError, LlmProvider, LlmRequestOptions, LlmResponse, LlmResult, Message, ProviderConfig,
};

// ============================================================================
// Mock provider
// ============================================================================

/// Returns one scripted outcome per call and counts the calls.
struct MockLlmProvider {
    responses: Mutex<Vec<LlmResult<LlmResponse>>>,
    calls: AtomicUsize,
    config: ProviderConfig,
}

impl MockLlmProvider {
    fn new(responses: Vec<LlmResult<LlmResponse>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses),
            calls: AtomicUsize::new(0),
            config: ProviderConfig::default(),
        })
    }

    fn replying(text: &str) -> Arc<Self> {
        Self::new(vec![Ok(LlmResponse::text(text, "mock-model"))])
    }

    fn failing(error: LlmError) -> Arc<Self> {
        Self::new(vec![Err(error)])
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn send_message(
        &self,
        _messages: Vec<Message>,
        _system: Option<String>,
        _request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Err(LlmError::Other {
                message: "No more mock responses available".to_string(),
            })
        } else {
            responses.remove(0)
        }
    }

    async fn health_check(&self) -> LlmResult<()> {
        Ok(())
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

fn parser_with(provider: Arc<MockLlmProvider>) -> IntentParser {
    IntentParser::builtin()
        .unwrap()
        .with_fallback(FallbackResolver::new(provider))
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_fallback_resolves_unmatched_command() {
    let provider = MockLlmProvider::replying(
        r#"{"intent": "run-drush", "params": {"command": "updatedb"}}"#,
    );
    let cmd = parser_with(provider.clone())
        .parse("Apply pending database updates")
        .await;

    assert_eq!(cmd.intent, Intent::RunDrush);
    assert_eq!(cmd.param_str("command"), Some("updatedb"));
    assert_eq!(cmd.source, ParseSource::Fallback);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_fallback_reply_in_code_fence() {
    let provider = MockLlmProvider::replying(
        "```json\n{\"intent\": \"status-site\", \"params\": {\"project_name\": \"blog\"}}\n```",
    );
    let cmd = parser_with(provider).parse("how is blog doing").await;
    assert_eq!(cmd.intent, Intent::StatusSite);
    assert_eq!(cmd.param_str("project_name"), Some("blog"));
}

#[tokio::test]
async fn test_malformed_reply_degrades_to_unknown() {
    let provider = MockLlmProvider::replying("I think you want to clear something?");
    let cmd = parser_with(provider.clone()).parse("Purge Varnish").await;

    assert!(cmd.is_unknown());
    assert_eq!(cmd.source, ParseSource::Degraded);
    assert_eq!(cmd.param_str("raw_command"), Some("purge varnish"));
    assert_eq!(cmd.params.len(), 1);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_provider_error_degrades_without_retry() {
    let provider = MockLlmProvider::failing(LlmError::ProviderUnavailable {
        message: "connection refused".to_string(),
    });
    let cmd = parser_with(provider.clone()).parse("Purge Varnish").await;

    assert!(cmd.is_unknown());
    assert_eq!(cmd.param_str("raw_command"), Some("purge varnish"));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_out_of_vocabulary_intent_degrades() {
    let provider = MockLlmProvider::replying(r#"{"intent": "query-nodes", "params": {}}"#);
    let cmd = parser_with(provider).parse("Purge Varnish").await;
    assert!(cmd.is_unknown());
    assert_eq!(cmd.source, ParseSource::Degraded);
}

#[tokio::test]
async fn test_unknown_reply_gets_raw_command() {
    let provider = MockLlmProvider::replying(r#"{"intent": "unknown", "params": {}}"#);
    let cmd = parser_with(provider).parse("Sing A Song").await;
    assert!(cmd.is_unknown());
    assert_eq!(cmd.source, ParseSource::Fallback);
    assert_eq!(cmd.param_str("raw_command"), Some("sing a song"));
}

#[tokio::test]
async fn test_pattern_match_skips_fallback() {
    let provider = MockLlmProvider::new(Vec::new());
    let cmd = parser_with(provider.clone()).parse("run cron").await;
    assert_eq!(cmd.intent, Intent::RunDrush);
    assert_eq!(cmd.param_str("command"), Some("cron:run"));
    assert_eq!(provider.calls(), 0);
}
