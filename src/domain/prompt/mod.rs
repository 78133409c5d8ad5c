//! Prompt templates used to ask the LLM about retrieved context

mod template;

pub use template::{PromptTemplate, PromptVariable, TemplateError, DEFAULT_QA_TEMPLATE};
