//! Settings Models
//!
//! Agent configuration: Drupal endpoint and credentials, AI provider
//! selection, local tooling paths and site defaults.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables.

use std::path::Path;

use serde::{Deserialize, Serialize};

use drupal_agent_llm::{ProviderConfig, ProviderType};

use crate::utils::error::{AppError, AppResult};
use crate::utils::paths;

const REDACTED: &str = "********";

/// Agent configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Drupal site root URL
    pub drupal_base_url: String,
    pub drupal_username: String,
    pub drupal_password: String,
    /// GraphQL path relative to the base URL
    pub graphql_endpoint: String,

    /// Provider used when a command does not name one
    pub default_ai_provider: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub ollama_base_url: String,
    pub ollama_model: String,
    /// Ollama request timeout in seconds
    pub ollama_timeout: u64,

    pub drush_path: String,
    pub ddev_path: String,
    pub lando_path: String,

    pub default_site_directory: String,
    pub default_drupal_version: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            drupal_base_url: "http://localhost:8080".to_string(),
            drupal_username: "admin".to_string(),
            drupal_password: "admin".to_string(),
            graphql_endpoint: "/graphql".to_string(),
            default_ai_provider: "ollama".to_string(),
            openai_api_key: None,
            openai_model: "gpt-3.5-turbo".to_string(),
            anthropic_api_key: None,
            anthropic_model: "claude-3-sonnet-20240229".to_string(),
            ollama_base_url: "http://localhost:11434".to_string(),
            ollama_model: "llama3.2:3b".to_string(),
            ollama_timeout: 120,
            drush_path: "drush".to_string(),
            ddev_path: "ddev".to_string(),
            lando_path: "lando".to_string(),
            default_site_directory: "./sites".to_string(),
            default_drupal_version: "drupal10".to_string(),
        }
    }
}

impl AgentConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// read when present. Environment variables are applied last.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let mut config = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(AppError::config(format!(
                        "Config file not found: {}",
                        p.display()
                    )));
                }
                Self::from_file(p)?
            }
            None => match paths::config_path() {
                Ok(default_path) if default_path.exists() => Self::from_file(&default_path)?,
                _ => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read a TOML file; keys it omits keep their defaults.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AgentConfig = toml::from_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Override fields from environment-style variables supplied by `lookup`.
    ///
    /// Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let strings: [(&str, &mut String); 13] = [
            ("DRUPAL_BASE_URL", &mut self.drupal_base_url),
            ("DRUPAL_USERNAME", &mut self.drupal_username),
            ("DRUPAL_PASSWORD", &mut self.drupal_password),
            ("GRAPHQL_ENDPOINT", &mut self.graphql_endpoint),
            ("DEFAULT_AI_PROVIDER", &mut self.default_ai_provider),
            ("OLLAMA_BASE_URL", &mut self.ollama_base_url),
            ("OLLAMA_MODEL", &mut self.ollama_model),
            ("DRUSH_PATH", &mut self.drush_path),
            ("DDEV_PATH", &mut self.ddev_path),
            ("LANDO_PATH", &mut self.lando_path),
            ("DEFAULT_SITE_DIRECTORY", &mut self.default_site_directory),
            ("DEFAULT_DRUPAL_VERSION", &mut self.default_drupal_version),
            ("OPENAI_MODEL", &mut self.openai_model),
        ];
        for (key, field) in strings {
            if let Some(value) = get(key) {
                *field = value;
            }
        }

        if let Some(key) = get("OPENAI_API_KEY") {
            self.openai_api_key = Some(key);
        }
        if let Some(key) = get("ANTHROPIC_API_KEY") {
            self.anthropic_api_key = Some(key);
        }
        if let Some(timeout) = get("OLLAMA_TIMEOUT") {
            self.ollama_timeout = timeout.trim().parse().map_err(|_| {
                AppError::config(format!("OLLAMA_TIMEOUT must be a number of seconds: {}", timeout))
            })?;
        }

        Ok(())
    }

    /// Full GraphQL endpoint URL
    pub fn graphql_url(&self) -> String {
        format!(
            "{}{}",
            self.drupal_base_url.trim_end_matches('/'),
            self.graphql_endpoint
        )
    }

    /// Full JSON:API root URL
    pub fn jsonapi_url(&self) -> String {
        format!("{}/jsonapi", self.drupal_base_url.trim_end_matches('/'))
    }

    /// The configured default provider.
    pub fn default_provider(&self) -> AppResult<ProviderType> {
        Ok(self.default_ai_provider.parse::<ProviderType>()?)
    }

    fn has_key(key: &Option<String>) -> bool {
        key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Check the configuration is usable: a Drupal base URL, a known default
    /// provider, and at least one provider with what it needs to connect.
    pub fn validate(&self) -> AppResult<()> {
        if self.drupal_base_url.trim().is_empty() {
            return Err(AppError::validation("DRUPAL_BASE_URL is empty"));
        }

        self.default_provider()?;

        let any_provider = Self::has_key(&self.openai_api_key)
            || Self::has_key(&self.anthropic_api_key)
            || !self.ollama_base_url.trim().is_empty();
        if !any_provider {
            return Err(AppError::validation(
                "No AI provider configured: set OLLAMA_BASE_URL, OPENAI_API_KEY or ANTHROPIC_API_KEY",
            ));
        }

        Ok(())
    }

    /// Build the provider configuration for `provider`, or the default provider.
    pub fn provider_config(&self, provider: Option<ProviderType>) -> AppResult<ProviderConfig> {
        let provider = match provider {
            Some(p) => p,
            None => self.default_provider()?,
        };

        let config = match provider {
            ProviderType::Ollama => ProviderConfig {
                provider,
                base_url: Some(self.ollama_base_url.clone()),
                model: self.ollama_model.clone(),
                timeout_secs: self.ollama_timeout,
                ..Default::default()
            },
            ProviderType::OpenAI => ProviderConfig {
                provider,
                api_key: self.openai_api_key.clone(),
                model: self.openai_model.clone(),
                ..Default::default()
            },
            ProviderType::Anthropic => ProviderConfig {
                provider,
                api_key: self.anthropic_api_key.clone(),
                model: self.anthropic_model.clone(),
                ..Default::default()
            },
        };
        Ok(config)
    }

    /// Copy with secrets masked, for display.
    pub fn redacted(&self) -> Self {
        let mask = |key: &Option<String>| key.as_ref().map(|_| REDACTED.to_string());
        Self {
            drupal_password: REDACTED.to_string(),
            openai_api_key: mask(&self.openai_api_key),
            anthropic_api_key: mask(&self.anthropic_api_key),
            ..self.clone()
        }
    }
}
