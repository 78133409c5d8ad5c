//! Query engine domain types
//!
//! A query engine turns a free-text question into an [`Answer`] using the
//! retrieval index built from the vector cache.

mod answer;
mod engine;

pub use answer::{Answer, SourceNode};
pub use engine::QueryEngine;

#[cfg(test)]
pub use engine::MockQueryEngine;
