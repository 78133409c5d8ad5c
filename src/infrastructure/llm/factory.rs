use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::anthropic::DEFAULT_ANTHROPIC_BASE_URL;
use super::http_client::HttpClient;
use super::ollama::DEFAULT_OLLAMA_BASE_URL;
use super::openai::DEFAULT_OPENAI_BASE_URL;
use super::{AnthropicProvider, OllamaProvider, OpenAiProvider};
use crate::config::{LlmConfig, ProviderKind};
use crate::domain::{DomainError, LlmProvider};

/// Factory for creating LLM providers
#[derive(Debug)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create the configured LLM provider, resolving API keys from the
    /// environment when the config leaves them out
    pub fn create(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, DomainError> {
        let api_key = config.provider.resolve_api_key(config.api_key.as_deref());
        Self::create_with_key(config, api_key)
    }

    fn create_with_key(
        config: &LlmConfig,
        api_key: Option<String>,
    ) -> Result<Arc<dyn LlmProvider>, DomainError> {
        let http_client =
            HttpClient::with_timeout(Duration::from_secs(config.request_timeout_secs))?;

        info!(
            provider = config.provider.name(),
            model = %config.model,
            timeout_secs = config.request_timeout_secs,
            "Creating LLM provider"
        );

        match config.provider {
            ProviderKind::Ollama => {
                let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_OLLAMA_BASE_URL);
                Ok(Arc::new(OllamaProvider::with_base_url(http_client, base_url)))
            }

            ProviderKind::OpenAi => {
                let api_key = Self::require_key(config.provider, api_key)?;
                let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_OPENAI_BASE_URL);
                Ok(Arc::new(OpenAiProvider::with_base_url(
                    http_client,
                    api_key,
                    base_url,
                )))
            }

            ProviderKind::Anthropic => {
                let api_key = Self::require_key(config.provider, api_key)?;
                let base_url = config
                    .base_url
                    .as_deref()
                    .unwrap_or(DEFAULT_ANTHROPIC_BASE_URL);
                Ok(Arc::new(AnthropicProvider::with_base_url(
                    http_client,
                    api_key,
                    base_url,
                )))
            }
        }
    }

    fn require_key(kind: ProviderKind, api_key: Option<String>) -> Result<String, DomainError> {
        api_key.ok_or_else(|| {
            DomainError::configuration(format!(
                "No API key for {}: set llm.api_key or {}",
                kind.name(),
                kind.api_key_env().unwrap_or("an API key")
            ))
        })
    }
}
