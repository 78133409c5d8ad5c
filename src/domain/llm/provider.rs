use async_trait::async_trait;
use std::fmt::Debug;

use super::{LlmRequest, LlmResponse};
use crate::domain::DomainError;

/// Trait for chat-completion providers (Ollama, OpenAI, Anthropic)
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// One non-streaming completion with `model`
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError>;

    /// Label used in errors and logs
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::llm::Message;
    use std::sync::Mutex;

    /// Replies with a canned answer (or fails) and records what it was asked
    #[derive(Debug)]
    pub struct MockLlmProvider {
        outcome: Result<String, String>,
        requests: Mutex<Vec<(String, LlmRequest)>>,
    }

    impl Default for MockLlmProvider {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockLlmProvider {
        pub fn new() -> Self {
            Self {
                outcome: Err("No mock response configured".to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn with_reply(self, reply: impl Into<String>) -> Self {
            Self {
                outcome: Ok(reply.into()),
                ..self
            }
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            Self {
                outcome: Err(error.into()),
                ..self
            }
        }

        /// (model, request) pairs in call order
        pub fn requests(&self) -> Vec<(String, LlmRequest)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
            self.requests
                .lock()
                .unwrap()
                .push((model.to_string(), request));

            match &self.outcome {
                Ok(reply) => Ok(LlmResponse::new(
                    "mock-1",
                    model,
                    Message::assistant(reply.clone()),
                )),
                Err(error) => Err(DomainError::provider("mock", error.clone())),
            }
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }
}
