use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::ollama::DEFAULT_OLLAMA_BASE_URL;
use super::openai::DEFAULT_OPENAI_BASE_URL;
use super::{HttpClient, OllamaEmbeddingProvider, OpenAiEmbeddingProvider};
use crate::config::{EmbeddingConfig, ProviderKind};
use crate::domain::{DomainError, EmbeddingProvider};

/// Factory for creating embedding providers
#[derive(Debug)]
pub struct EmbeddingProviderFactory;

impl EmbeddingProviderFactory {
    /// Create the configured embedding provider
    ///
    /// Provider kinds without an embeddings API are rejected here, before any
    /// document is read.
    pub fn create(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
        let api_key = config.provider.resolve_api_key(config.api_key.as_deref());
        Self::create_with_key(config, api_key)
    }

    fn create_with_key(
        config: &EmbeddingConfig,
        api_key: Option<String>,
    ) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
        info!(
            provider = config.provider.name(),
            model = %config.model,
            "Creating embedding provider"
        );

        match config.provider {
            ProviderKind::Ollama => {
                let http_client = Self::http_client(config)?;
                let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_OLLAMA_BASE_URL);
                Ok(Arc::new(OllamaEmbeddingProvider::with_base_url(
                    http_client,
                    &config.model,
                    base_url,
                )))
            }

            ProviderKind::OpenAi => {
                let api_key = api_key.ok_or_else(|| {
                    DomainError::configuration(
                        "No API key for openai: set embedding.api_key or OPENAI_API_KEY",
                    )
                })?;
                let http_client = Self::http_client(config)?;
                let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_OPENAI_BASE_URL);

                let mut provider = OpenAiEmbeddingProvider::with_base_url(
                    http_client,
                    api_key,
                    &config.model,
                    base_url,
                );

                if let Some(dims) = config.dimensions {
                    provider = provider.with_dimensions(dims);
                }

                Ok(Arc::new(provider))
            }

            ProviderKind::Anthropic => Err(DomainError::not_supported(format!(
                "{} does not provide an embeddings API",
                config.provider.name()
            ))),
        }
    }

    fn http_client(config: &EmbeddingConfig) -> Result<HttpClient, DomainError> {
        HttpClient::with_timeout(Duration::from_secs(config.request_timeout_secs))
    }
}
