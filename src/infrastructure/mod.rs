//! Infrastructure layer - external service implementations

pub mod embedding;
pub mod index;
pub mod ingestion;
pub mod llm;
pub mod logging;
pub mod services;
pub mod vector_cache;
