//! Cache entry types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Mapping from document identifier to embedding vector
///
/// Components are `f32`, the width embedding models produce. Caches written
/// with 64-bit floats load fine but are rounded to the nearest `f32`.
pub type VectorMap = HashMap<String, Vec<f32>>;

/// A single row of the vector cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    doc_id: String,
    embedding: Vec<f32>,
}

impl CacheEntry {
    /// Create a new cache entry
    pub fn new(doc_id: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            doc_id: doc_id.into(),
            embedding,
        }
    }

    /// Rebuild an entry from its stored textual form
    pub fn from_stored(doc_id: impl Into<String>, encoded: &str) -> Result<Self, DomainError> {
        let doc_id = doc_id.into();
        let embedding: Vec<f32> = serde_json::from_str(encoded).map_err(|e| {
            DomainError::storage(format!(
                "Failed to decode embedding for '{}': {}",
                doc_id, e
            ))
        })?;

        Ok(Self { doc_id, embedding })
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    /// Serialize the embedding to the textual form stored in the cache
    pub fn encoded_embedding(&self) -> Result<String, DomainError> {
        // serde_json rejects NaN/inf, so anything that encodes also decodes
        if self.embedding.iter().any(|v| !v.is_finite()) {
            return Err(DomainError::storage(format!(
                "Embedding for '{}' contains non-finite values",
                self.doc_id
            )));
        }

        serde_json::to_string(&self.embedding).map_err(|e| {
            DomainError::storage(format!(
                "Failed to encode embedding for '{}': {}",
                self.doc_id, e
            ))
        })
    }

    pub fn into_parts(self) -> (String, Vec<f32>) {
        (self.doc_id, self.embedding)
    }
}
