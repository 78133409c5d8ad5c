//! Vector cache implementations

mod sqlite;

pub use sqlite::{SqliteVectorCache, DEFAULT_CACHE_PATH};
