//! In-memory vector index built from the reloaded cache

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::RetrieverQueryEngine;
use crate::domain::embedding::cosine_similarity;
use crate::domain::{DomainError, EmbeddingProvider, LlmProvider, SourceNode, VectorMap};

/// One retrievable unit: a chunk's text and its embedding
#[derive(Debug, Clone, PartialEq)]
pub struct IndexNode {
    pub doc_id: String,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// Brute-force cosine index over every cached chunk
#[derive(Debug)]
pub struct VectorStoreIndex {
    nodes: Vec<IndexNode>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl VectorStoreIndex {
    /// Join cached vectors with chunk texts by doc_id
    ///
    /// Cache entries without a known text are skipped. Nodes are kept in
    /// doc_id order.
    pub fn build(
        vectors: VectorMap,
        texts: &HashMap<String, String>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        let mut nodes: Vec<IndexNode> = Vec::with_capacity(vectors.len());
        let mut skipped = 0usize;

        for (doc_id, embedding) in vectors {
            match texts.get(&doc_id) {
                Some(text) => nodes.push(IndexNode {
                    text: text.clone(),
                    doc_id,
                    embedding,
                }),
                None => {
                    skipped += 1;
                    debug!(doc_id = %doc_id, "No text for cached vector");
                }
            }
        }

        if skipped > 0 {
            warn!(skipped, "Cached vectors without a matching chunk were left out of the index");
        }

        nodes.sort_by(|a, b| a.doc_id.cmp(&b.doc_id));

        Self { nodes, embedder }
    }

    pub fn nodes(&self) -> &[IndexNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Rank nodes against an already embedded query
    pub fn search(&self, query: &[f32], top_k: usize) -> Vec<SourceNode> {
        let mut scored: Vec<(f32, &IndexNode)> = self
            .nodes
            .iter()
            .map(|node| (cosine_similarity(query, &node.embedding), node))
            .collect();

        scored.sort_by(|(sa, a), (sb, b)| {
            sb.partial_cmp(sa)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });

        scored
            .into_iter()
            .take(top_k)
            .map(|(score, node)| SourceNode::new(node.doc_id.clone(), score, node.text.clone()))
            .collect()
    }

    /// Embed the question and return the `top_k` most similar nodes
    pub async fn retrieve(
        &self,
        question: &str,
        top_k: usize,
    ) -> Result<Vec<SourceNode>, DomainError> {
        if self.nodes.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let query = self.embedder.embed_text(question).await?;
        let results = self.search(&query, top_k);

        debug!(
            top_k,
            hits = results.len(),
            best = results.first().map(|n| n.score),
            "Retrieved nodes"
        );

        Ok(results)
    }

    /// Wrap the index in an LLM-backed query engine
    pub fn as_query_engine(
        self,
        llm: Arc<dyn LlmProvider>,
        model: impl Into<String>,
    ) -> RetrieverQueryEngine {
        RetrieverQueryEngine::new(Arc::new(self), llm, model)
    }
}
