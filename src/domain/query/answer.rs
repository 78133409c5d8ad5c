use std::fmt;

use serde::{Deserialize, Serialize};

/// A retrieved chunk that was used as context for an answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceNode {
    pub doc_id: String,
    pub score: f32,
    pub text: String,
}

impl SourceNode {
    pub fn new(doc_id: impl Into<String>, score: f32, text: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            score,
            text: text.into(),
        }
    }
}

/// Result of a query: the synthesized text plus the context it was built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    text: String,
    sources: Vec<SourceNode>,
}

impl Answer {
    pub fn new(text: impl Into<String>, sources: Vec<SourceNode>) -> Self {
        Self {
            text: text.into(),
            sources,
        }
    }

    /// An answer with no supporting context
    pub fn text_only(text: impl Into<String>) -> Self {
        Self::new(text, Vec::new())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sources(&self) -> &[SourceNode] {
        &self.sources
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
