//! Document ingestion domain types and traits
//!
//! This module provides:
//! - `DocumentParser` trait for parsing various document formats
//! - `ChunkingStrategy` trait for splitting documents into chunks
//! - `Document` / `DocumentChunk`, the units that flow into the vector cache

pub mod chunker;
pub mod document;
pub mod parser;
pub mod parser_type;

pub use chunker::{Chunk, ChunkingConfig, ChunkingStrategy};
pub use document::{chunk_id, Document, DocumentChunk};
pub use parser::{DocumentMetadata, DocumentParser, ParsedDocument, ParserInput};
pub use parser_type::ParserType;
