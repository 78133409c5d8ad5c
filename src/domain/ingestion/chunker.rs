//! Splitting document text into embeddable pieces

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Sizes are counted in characters, not bytes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    /// Tail of the previous chunk repeated at the start of the next one
    pub chunk_overlap: usize,
    /// Shorter chunks are dropped, except when a document yields only one
    pub min_chunk_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 2000,
            chunk_overlap: 200,
            min_chunk_size: 50,
        }
    }
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            min_chunk_size: 0,
        }
    }

    pub fn with_min_chunk_size(self, min_chunk_size: usize) -> Self {
        Self {
            min_chunk_size,
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let problem = if self.chunk_size == 0 {
            Some("chunk_size must be at least 1")
        } else if self.chunk_overlap >= self.chunk_size {
            Some("chunk_overlap must be smaller than chunk_size")
        } else if self.min_chunk_size > self.chunk_size {
            Some("min_chunk_size cannot exceed chunk_size")
        } else {
            None
        };

        match problem {
            Some(message) => Err(DomainError::validation(message)),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub content: String,
    /// Position within the document, from 0
    pub index: usize,
    pub total: usize,
}

impl Chunk {
    pub fn new(content: impl Into<String>, index: usize, total: usize) -> Self {
        Self {
            content: content.into(),
            index,
            total,
        }
    }
}

pub trait ChunkingStrategy: Send + Sync + Debug {
    /// Blank input yields no chunks
    fn chunk(&self, content: &str, config: &ChunkingConfig) -> Result<Vec<Chunk>, DomainError>;

    /// Short label for logs
    fn name(&self) -> &'static str;
}
