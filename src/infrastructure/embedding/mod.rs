//! Embedding provider implementations

mod factory;
mod ollama;
mod openai;

pub use factory::EmbeddingProviderFactory;
pub use ollama::OllamaEmbeddingProvider;
pub use openai::OpenAiEmbeddingProvider;

// Embedding providers share the LLM HTTP client
pub use super::llm::{HttpClient, HttpClientTrait};
