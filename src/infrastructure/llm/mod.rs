//! LLM provider implementations

mod anthropic;
mod factory;
mod http_client;
mod ollama;
mod openai;

pub use anthropic::AnthropicProvider;
pub use factory::LlmProviderFactory;
pub use http_client::{HttpClient, HttpClientTrait};
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

#[cfg(test)]
pub use http_client::mock::MockHttpClient;
