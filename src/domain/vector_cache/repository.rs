//! Vector cache trait definition

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::VectorMap;
use crate::domain::DomainError;

/// Durable `doc_id -> embedding` store
///
/// Implementations are bound to one backing location. No operation keeps a
/// connection open after it returns.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VectorCache: Send + Sync {
    /// Create the backing table if it does not exist yet
    async fn initialize(&self) -> Result<(), DomainError>;

    /// Insert or replace every entry of the mapping
    async fn upsert_all(&self, vectors: &VectorMap) -> Result<(), DomainError>;

    /// Read the whole table back
    async fn load_all(&self) -> Result<VectorMap, DomainError>;
}
