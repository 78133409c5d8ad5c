//! Loaded documents and their chunks

use super::{Chunk, DocumentMetadata};

/// A source document as loaded from the data directory
#[derive(Debug, Clone)]
pub struct Document {
    /// Path relative to the data directory, with `/` separators
    pub id: String,
    pub text: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>, metadata: DocumentMetadata) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata,
        }
    }

    /// Turn chunks of this document into retrievable units
    pub fn into_chunks(self, chunks: Vec<Chunk>) -> Vec<DocumentChunk> {
        chunks
            .into_iter()
            .map(|chunk| DocumentChunk {
                doc_id: chunk_id(&self.id, chunk.index),
                document_id: self.id.clone(),
                text: chunk.content,
                metadata: self.metadata.clone(),
            })
            .collect()
    }
}

/// The unit that gets embedded, cached and retrieved
#[derive(Debug, Clone)]
pub struct DocumentChunk {
    /// Cache key: `{document_id}#{chunk_index}`
    pub doc_id: String,
    pub document_id: String,
    pub text: String,
    pub metadata: DocumentMetadata,
}

/// Build the cache key of a document chunk
pub fn chunk_id(document_id: &str, index: usize) -> String {
    format!("{}#{}", document_id, index)
}
