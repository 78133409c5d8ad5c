//! Anthropic Messages API (`/v1/messages`)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::http_client::HttpClientTrait;
use crate::domain::{
    DomainError, FinishReason, LlmProvider, LlmRequest, LlmResponse, Message, MessageRole, Usage,
};

pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

const PROVIDER: &str = "anthropic";
const API_VERSION: &str = "2023-06-01";
/// The API rejects requests without `max_tokens`
const DEFAULT_MAX_TOKENS: u32 = 1024;

#[derive(Debug)]
pub struct AnthropicProvider<C: HttpClientTrait> {
    client: C,
    api_key: String,
    endpoint: String,
}

impl<C: HttpClientTrait> AnthropicProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_ANTHROPIC_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();

        Self {
            client,
            api_key: api_key.into(),
            endpoint: format!("{}/v1/messages", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for AnthropicProvider<C> {
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        let body = serde_json::to_value(MessagesRequest::new(model, &request))
            .map_err(|e| DomainError::provider(PROVIDER, format!("Invalid request: {}", e)))?;

        let headers = vec![
            ("x-api-key", self.api_key.as_str()),
            ("anthropic-version", API_VERSION),
            ("Content-Type", "application/json"),
        ];

        let raw = self.client.post_json(&self.endpoint, headers, &body).await?;

        let reply: MessagesReply = serde_json::from_value(raw).map_err(|e| {
            DomainError::provider(PROVIDER, format!("Unexpected messages payload: {}", e))
        })?;

        Ok(reply.into_response())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Turn<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct Turn<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> MessagesRequest<'a> {
    /// System messages move to the top-level `system` field
    fn new(model: &'a str, request: &'a LlmRequest) -> Self {
        let (system, turns): (Vec<&Message>, Vec<&Message>) = request
            .messages
            .iter()
            .partition(|m| m.role == MessageRole::System);

        let system = (!system.is_empty()).then(|| {
            system
                .iter()
                .map(|m| m.content.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        });

        Self {
            model,
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            system,
            messages: turns
                .into_iter()
                .map(|m| Turn {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: request.temperature,
        }
    }
}

#[derive(Deserialize)]
struct MessagesReply {
    id: String,
    model: String,
    content: Vec<Block>,
    stop_reason: Option<String>,
    usage: ReplyUsage,
}

#[derive(Deserialize)]
struct Block {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Deserialize)]
struct ReplyUsage {
    input_tokens: u32,
    output_tokens: u32,
}

impl MessagesReply {
    fn into_response(self) -> LlmResponse {
        let text: String = self
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();

        let usage = Usage::new(self.usage.input_tokens, self.usage.output_tokens);
        let response = LlmResponse::new(self.id, self.model, Message::assistant(text)).with_usage(usage);

        match self.stop_reason.as_deref() {
            Some(reason) => response.with_finish_reason(FinishReason::from_provider(reason)),
            None => response,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;
    use serde_json::json;

    const ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
    const MODEL: &str = "claude-3-5-haiku-latest";

    fn reply(blocks: serde_json::Value, stop_reason: &str) -> serde_json::Value {
        json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "model": MODEL,
            "content": blocks,
            "stop_reason": stop_reason,
            "usage": { "input_tokens": 310, "output_tokens": 14 }
        })
    }

    #[tokio::test]
    async fn test_text_blocks_are_concatenated() {
        let blocks = json!([
            { "type": "text", "text": "Support is open " },
            { "type": "tool_use", "id": "t1", "name": "noop", "input": {} },
            { "type": "text", "text": "on weekdays." }
        ]);
        let client = MockHttpClient::new().with_response(ENDPOINT, reply(blocks, "end_turn"));
        let provider = AnthropicProvider::new(client, "sk-ant");

        let response = provider
            .chat(MODEL, LlmRequest::builder().user("When is support open?").build())
            .await
            .unwrap();

        assert_eq!(response.content(), "Support is open on weekdays.");
        assert_eq!(response.finish_reason, Some(FinishReason::Stop));
        assert_eq!(response.usage.map(|u| u.total_tokens), Some(324));
    }

    #[tokio::test]
    async fn test_system_prompts_are_lifted_and_headers_sent() {
        let blocks = json!([{ "type": "text", "text": "..." }]);
        let client = MockHttpClient::new().with_response(ENDPOINT, reply(blocks, "max_tokens"));
        let provider = AnthropicProvider::new(client, "sk-ant");

        let request = LlmRequest::builder()
            .system("Be brief.")
            .system("Cite the context.")
            .user("Summarize the terms.")
            .build();
        let response = provider.chat(MODEL, request).await.unwrap();
        assert_eq!(response.finish_reason, Some(FinishReason::Length));

        let (_, body) = &provider.client.requests()[0];
        assert_eq!(body["system"], "Be brief.\nCite the context.");
        assert_eq!(body["messages"], json!([{ "role": "user", "content": "Summarize the terms." }]));
        assert_eq!(body["max_tokens"], DEFAULT_MAX_TOKENS);
        assert!(body.get("temperature").is_none());
    }

    #[tokio::test]
    async fn test_explicit_max_tokens_and_base_url() {
        let endpoint = "http://proxy.internal:9000/v1/messages";
        let blocks = json!([{ "type": "text", "text": "ok" }]);
        let client = MockHttpClient::new().with_response(endpoint, reply(blocks, "end_turn"));
        let provider = AnthropicProvider::with_base_url(client, "sk-ant", "http://proxy.internal:9000");

        let request = LlmRequest::builder().user("hi").max_tokens(64).temperature(0.2).build();
        provider.chat(MODEL, request).await.unwrap();

        let (url, body) = &provider.client.requests()[0];
        assert_eq!(url, endpoint);
        assert_eq!(body["max_tokens"], 64);
        assert!(body.get("system").is_none());
    }
}
