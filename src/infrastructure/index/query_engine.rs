//! Retrieval-augmented question answering

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::VectorStoreIndex;
use crate::domain::{
    Answer, DomainError, LlmProvider, LlmRequest, PromptTemplate, QueryEngine,
    DEFAULT_QA_TEMPLATE,
};

/// Answer returned when retrieval finds nothing to ground the LLM on
pub const EMPTY_RESPONSE: &str = "Empty Response";

pub const DEFAULT_TOP_K: usize = 2;

/// Retrieves the closest chunks and asks the LLM to answer from them
#[derive(Debug)]
pub struct RetrieverQueryEngine {
    index: Arc<VectorStoreIndex>,
    llm: Arc<dyn LlmProvider>,
    model: String,
    template: PromptTemplate,
    top_k: usize,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl RetrieverQueryEngine {
    pub fn new(
        index: Arc<VectorStoreIndex>,
        llm: Arc<dyn LlmProvider>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            index,
            llm,
            model: model.into(),
            template: PromptTemplate::parse(DEFAULT_QA_TEMPLATE),
            top_k: DEFAULT_TOP_K,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Replace the QA prompt; it must reference `context` and `query`
    pub fn with_template(mut self, template: &str) -> Result<Self, DomainError> {
        let template = PromptTemplate::parse(template);
        template.expect_variables(&["context", "query"])?;
        self.template = template;
        Ok(self)
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn build_prompt(&self, question: &str, context: &str) -> Result<String, DomainError> {
        let values = HashMap::from([
            ("context".to_string(), context.to_string()),
            ("query".to_string(), question.to_string()),
        ]);

        Ok(self.template.render(&values)?)
    }
}

#[async_trait]
impl QueryEngine for RetrieverQueryEngine {
    async fn query(&self, question: &str) -> Result<Answer, DomainError> {
        let sources = self.index.retrieve(question, self.top_k).await?;

        if sources.is_empty() {
            info!("No context retrieved, skipping LLM call");
            return Ok(Answer::text_only(EMPTY_RESPONSE));
        }

        let context = sources
            .iter()
            .map(|node| node.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = self.build_prompt(question, &context)?;

        let mut builder = LlmRequest::builder().user(prompt);
        if let Some(temperature) = self.temperature {
            builder = builder.temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            builder = builder.max_tokens(max_tokens);
        }

        debug!(
            model = %self.model,
            sources = sources.len(),
            provider = self.llm.provider_name(),
            "Sending QA prompt"
        );

        let response = self.llm.chat(&self.model, builder.build()).await?;

        if let Some(usage) = &response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "LLM usage"
            );
        }

        Ok(Answer::new(response.content(), sources))
    }
}
