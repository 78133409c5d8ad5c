//! SQLite-backed vector cache
//!
//! One table, `vectors(doc_id TEXT PRIMARY KEY, embedding TEXT)`, with each
//! embedding stored as a JSON array. A connection is opened at the start of
//! every operation and closed before it returns.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{Connection, Row};
use tracing::debug;

use crate::domain::vector_cache::{CacheEntry, VectorCache, VectorMap};
use crate::domain::DomainError;

/// Default cache file, relative to the working directory
pub const DEFAULT_CACHE_PATH: &str = "vectors.db";

const TABLE_NAME: &str = "vectors";

/// Vector cache stored in a single SQLite file
#[derive(Debug, Clone)]
pub struct SqliteVectorCache {
    path: PathBuf,
}

impl SqliteVectorCache {
    /// Create a cache bound to the given database file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn connect(&self) -> Result<SqliteConnection, DomainError> {
        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true);

        SqliteConnection::connect_with(&options).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to open vector cache {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    async fn close(conn: SqliteConnection) -> Result<(), DomainError> {
        conn.close()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to close vector cache: {}", e)))
    }

    async fn table_exists(conn: &mut SqliteConnection) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(TABLE_NAME)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to inspect schema: {}", e)))?;

        Ok(row.is_some())
    }
}

#[async_trait]
impl VectorCache for SqliteVectorCache {
    async fn initialize(&self) -> Result<(), DomainError> {
        let mut conn = self.connect().await?;

        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                doc_id TEXT PRIMARY KEY,
                embedding TEXT
            )
            "#,
            TABLE_NAME
        );

        sqlx::query(&query)
            .execute(&mut conn)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create table: {}", e)))?;

        debug!(path = %self.path.display(), "Vector cache schema ready");

        Self::close(conn).await
    }

    async fn upsert_all(&self, vectors: &VectorMap) -> Result<(), DomainError> {
        // Encode everything up front so a bad vector aborts before any write
        let rows = vectors
            .iter()
            .map(|(doc_id, embedding)| {
                let entry = CacheEntry::new(doc_id.as_str(), embedding.clone());
                entry.encoded_embedding().map(|encoded| (doc_id, encoded))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut conn = self.connect().await?;

        let mut tx = conn
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        let query = format!(
            "INSERT OR REPLACE INTO {} (doc_id, embedding) VALUES (?, ?)",
            TABLE_NAME
        );

        for (doc_id, encoded) in &rows {
            sqlx::query(&query)
                .bind(doc_id.as_str())
                .bind(encoded.as_str())
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to save vector '{}': {}", doc_id, e))
                })?;
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit vectors: {}", e)))?;

        debug!(path = %self.path.display(), count = rows.len(), "Saved vectors");

        Self::close(conn).await
    }

    async fn load_all(&self) -> Result<VectorMap, DomainError> {
        let mut conn = self.connect().await?;

        if !Self::table_exists(&mut conn).await? {
            Self::close(conn).await?;
            return Ok(VectorMap::new());
        }

        let query = format!("SELECT doc_id, embedding FROM {}", TABLE_NAME);

        let rows = sqlx::query(&query)
            .fetch_all(&mut conn)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to load vectors: {}", e)))?;

        let mut vectors = VectorMap::with_capacity(rows.len());

        for row in rows {
            let doc_id: String = row
                .try_get("doc_id")
                .map_err(|e| DomainError::storage(format!("Invalid doc_id column: {}", e)))?;
            let encoded: String = row.try_get("embedding").map_err(|e| {
                DomainError::storage(format!("Invalid embedding for '{}': {}", doc_id, e))
            })?;

            let (doc_id, embedding) = CacheEntry::from_stored(doc_id, &encoded)?.into_parts();
            vectors.insert(doc_id, embedding);
        }

        debug!(path = %self.path.display(), count = vectors.len(), "Loaded vectors");

        Self::close(conn).await?;

        Ok(vectors)
    }
}
