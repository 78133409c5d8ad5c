//! Vector index and the query engine built on it

mod query_engine;
mod vector_store;

pub use query_engine::{RetrieverQueryEngine, DEFAULT_TOP_K, EMPTY_RESPONSE};
pub use vector_store::{IndexNode, VectorStoreIndex};
