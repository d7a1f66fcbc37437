//! Ollama Provider
//!
//! Implementation of the LlmProvider trait for Ollama local inference
//! using the ollama-rs native SDK. No API key is needed; JSON-constrained
//! output is requested through the chat `format` field.

use async_trait::async_trait;
use ollama_rs::generation::chat::request::ChatMessageRequest;
use ollama_rs::generation::chat::{ChatMessage, ChatMessageResponse, MessageRole as OllamaRole};
use ollama_rs::generation::parameters::FormatType;
use ollama_rs::models::ModelOptions;
use ollama_rs::Ollama;

use super::http_client::build_http_client;
use super::provider::LlmProvider;
use super::types::{
    LlmError, LlmRequestOptions, LlmResponse, LlmResult, Message, MessageRole, ProviderConfig,
    StopReason, UsageStats,
};

/// Default Ollama API endpoint
const OLLAMA_DEFAULT_URL: &str = "http://localhost:11434";

/// Default Ollama port when the base URL omits one
const OLLAMA_DEFAULT_PORT: u16 = 11434;

/// Ollama provider for local inference using the native ollama-rs SDK
pub struct OllamaProvider {
    config: ProviderConfig,
    client: Ollama,
}

impl OllamaProvider {
    /// Create a new Ollama provider with the given configuration
    pub fn new(config: ProviderConfig) -> LlmResult<Self> {
        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(OLLAMA_DEFAULT_URL)
            .to_string();

        let http_client = build_http_client(config.timeout())?;
        let client = Self::create_client(&base_url, http_client)?;

        Ok(Self { config, client })
    }

    /// Create an Ollama SDK client from a base URL string.
    ///
    /// The SDK takes host and port separately, so the URL is split here.
    fn create_client(base_url: &str, http_client: reqwest::Client) -> LlmResult<Ollama> {
        let parsed = url::Url::parse(base_url).map_err(|e| LlmError::InvalidRequest {
            message: format!("Invalid Ollama base URL '{}': {}", base_url, e),
        })?;
        let host = parsed.host_str().unwrap_or("localhost");
        let port = parsed.port().unwrap_or(OLLAMA_DEFAULT_PORT);
        let host_url = format!("{}://{}", parsed.scheme(), host);

        Ok(Ollama::new_with_client(host_url, port, http_client))
    }

    /// Get the base URL for the Ollama server (used in error messages)
    fn base_url(&self) -> &str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or(OLLAMA_DEFAULT_URL)
    }

    /// Build a ChatMessageRequest from our unified types
    fn build_chat_request(
        &self,
        messages: &[Message],
        system: Option<&str>,
        request_options: &LlmRequestOptions,
    ) -> ChatMessageRequest {
        let mut chat_messages: Vec<ChatMessage> = Vec::new();

        if let Some(sys) = system {
            chat_messages.push(ChatMessage::system(sys.to_string()));
        }
        chat_messages.extend(messages.iter().map(Self::convert_message));

        let mut request = ChatMessageRequest::new(self.config.model.clone(), chat_messages);

        let temperature = request_options
            .temperature_override
            .unwrap_or(self.config.temperature);
        let mut opts = ModelOptions::default().temperature(temperature);
        if self.config.max_tokens > 0 {
            opts = opts.num_predict(self.config.max_tokens as i32);
        }
        request = request.options(opts);

        if request_options.json_output {
            request = request.format(FormatType::Json);
        }

        request
    }

    /// Convert a unified Message to an ollama-rs ChatMessage.
    fn convert_message(message: &Message) -> ChatMessage {
        let role = match message.role {
            MessageRole::User => OllamaRole::User,
            MessageRole::Assistant => OllamaRole::Assistant,
            MessageRole::System => OllamaRole::System,
        };
        ChatMessage::new(role, message.content.clone())
    }

    /// Convert an ollama-rs ChatMessageResponse to our unified LlmResponse.
    fn convert_response(response: &ChatMessageResponse) -> LlmResponse {
        let content = &response.message.content;

        let usage = response
            .final_data
            .as_ref()
            .map(|final_data| UsageStats {
                input_tokens: final_data.prompt_eval_count as u32,
                output_tokens: final_data.eval_count as u32,
            })
            .unwrap_or_default();

        LlmResponse {
            content: if content.is_empty() {
                None
            } else {
                Some(content.clone())
            },
            stop_reason: StopReason::EndTurn,
            usage,
            model: response.model.clone(),
        }
    }

    /// Map an SDK error message onto the shared error taxonomy.
    fn classify_error(&self, msg: String) -> LlmError {
        if msg.contains("timed out") {
            LlmError::Timeout {
                seconds: self.config.timeout_secs,
            }
        } else if msg.contains("connect") || msg.contains("Connection refused") {
            LlmError::ProviderUnavailable {
                message: format!("Cannot connect to Ollama at {}: {}", self.base_url(), msg),
            }
        } else if msg.contains("not found") || msg.contains("404") {
            LlmError::ModelNotFound {
                model: self.config.model.clone(),
            }
        } else {
            LlmError::NetworkError { message: msg }
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn send_message(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
        request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse> {
        let request = self.build_chat_request(&messages, system.as_deref(), &request_options);

        tracing::debug!(
            model = %self.config.model,
            base_url = %self.base_url(),
            json_output = request_options.json_output,
            "sending Ollama chat request"
        );

        let response = self
            .client
            .send_chat_messages(request)
            .await
            .map_err(|e| self.classify_error(e.to_string()))?;

        Ok(Self::convert_response(&response))
    }

    async fn health_check(&self) -> LlmResult<()> {
        // Listing local models is the cheapest reachable endpoint
        let models = self
            .client
            .list_local_models()
            .await
            .map_err(|e| self.classify_error(e.to_string()))?;

        if !models.iter().any(|m| m.name == self.config.model) {
            tracing::warn!(
                model = %self.config.model,
                available = models.len(),
                "configured Ollama model is not pulled locally"
            );
        }

        Ok(())
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}
