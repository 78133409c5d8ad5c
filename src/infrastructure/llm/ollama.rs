//! Ollama chat (`/api/chat`, non-streaming)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::http_client::HttpClientTrait;
use crate::domain::{
    DomainError, FinishReason, LlmProvider, LlmRequest, LlmResponse, Message, Usage,
};

pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

const PROVIDER: &str = "ollama";

#[derive(Debug)]
pub struct OllamaProvider<C: HttpClientTrait> {
    client: C,
    endpoint: String,
}

impl<C: HttpClientTrait> OllamaProvider<C> {
    pub fn new(client: C) -> Self {
        Self::with_base_url(client, DEFAULT_OLLAMA_BASE_URL)
    }

    pub fn with_base_url(client: C, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();

        Self {
            client,
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for OllamaProvider<C> {
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        let body = serde_json::to_value(ChatRequest::new(model, &request))
            .map_err(|e| DomainError::provider(PROVIDER, format!("Invalid request: {}", e)))?;

        let raw = self.client.post_json(&self.endpoint, vec![], &body).await?;

        let reply: ChatReply = serde_json::from_value(raw).map_err(|e| {
            DomainError::provider(PROVIDER, format!("Failed to parse response: {}", e))
        })?;

        Ok(reply.into_response())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatTurn<'a>>,
    stream: bool,
    #[serde(skip_serializing_if = "ChatOptions::is_empty")]
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatTurn<'a> {
    role: &'static str,
    content: &'a str,
}

/// Sampling knobs; Ollama calls the output limit `num_predict`
#[derive(Serialize, Default)]
struct ChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

impl ChatOptions {
    fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.num_predict.is_none()
    }
}

impl<'a> ChatRequest<'a> {
    fn new(model: &'a str, request: &'a LlmRequest) -> Self {
        Self {
            model,
            messages: request
                .messages
                .iter()
                .map(|m| ChatTurn {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            stream: false,
            options: ChatOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        }
    }
}

#[derive(Deserialize)]
struct ChatReply {
    model: String,
    created_at: Option<String>,
    message: ReplyMessage,
    done_reason: Option<String>,
    prompt_eval_count: Option<u32>,
    eval_count: Option<u32>,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: String,
}

impl ChatReply {
    /// Ollama has no response id; the creation timestamp stands in for one
    fn into_response(self) -> LlmResponse {
        let mut response = LlmResponse::new(
            self.created_at.unwrap_or_default(),
            self.model,
            Message::assistant(self.message.content),
        );

        if let Some(reason) = self.done_reason.as_deref() {
            response = response.with_finish_reason(FinishReason::from_provider(reason));
        }
        if let (Some(prompt), Some(completion)) = (self.prompt_eval_count, self.eval_count) {
            response = response.with_usage(Usage::new(prompt, completion));
        }

        response
    }
}
