//! Vector cache domain types and traits
//!
//! The vector cache is the durable `doc_id -> embedding` mapping written after
//! embedding computation and read back in full before the index is built.

mod entry;
mod repository;

pub use entry::{CacheEntry, VectorMap};
pub use repository::VectorCache;

#[cfg(test)]
pub use repository::MockVectorCache;
