//! Domain layer - Core business logic and entities

pub mod embedding;
pub mod error;
pub mod ingestion;
pub mod llm;
pub mod prompt;
pub mod query;
pub mod vector_cache;

pub use embedding::{Embedding, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
pub use error::DomainError;
pub use ingestion::{Chunk, ChunkingConfig, ChunkingStrategy, Document, DocumentChunk};
pub use llm::{
    FinishReason, LlmProvider, LlmRequest, LlmRequestBuilder, LlmResponse, Message, MessageRole,
    Usage,
};
pub use prompt::{PromptTemplate, TemplateError, DEFAULT_QA_TEMPLATE};
pub use query::{Answer, QueryEngine, SourceNode};
pub use vector_cache::{CacheEntry, VectorCache, VectorMap};
