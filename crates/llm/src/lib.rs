//! Drupal Agent LLM
//!
//! Provides a unified interface for the generative providers the intent
//! fallback can talk to:
//! - Ollama (local inference, default)
//! - OpenAI
//! - Anthropic Claude
//!
//! Also includes the HTTP client factory shared by the providers.

pub mod anthropic;
pub mod http_client;
pub mod ollama;
pub mod openai;
pub mod provider;
pub mod types;

// Re-export main types
pub use anthropic::AnthropicProvider;
pub use http_client::build_http_client;
pub use ollama::OllamaProvider;
pub use openai::OpenAIProvider;
pub use provider::{create_provider, LlmProvider};
pub use types::*;
