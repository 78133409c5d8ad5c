//! Docs RAG
//!
//! Ask questions about a folder of local documents:
//! - Documents are loaded, chunked and embedded through a pluggable provider
//! - Embeddings are persisted in a SQLite vector cache and read back
//! - Questions are answered by an LLM grounded on the closest chunks

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::io::{BufRead, Write};
use std::sync::Arc;

use tracing::info;

use domain::{DomainError, EmbeddingProvider, LlmProvider};
use infrastructure::embedding::EmbeddingProviderFactory;
use infrastructure::index::RetrieverQueryEngine;
use infrastructure::ingestion::DirectoryReader;
use infrastructure::llm::LlmProviderFactory;
use infrastructure::services::IngestionService;
use infrastructure::vector_cache::SqliteVectorCache;

/// Every component of the pipeline, built once from configuration
#[derive(Debug)]
pub struct App {
    config: AppConfig,
    reader: DirectoryReader,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    cache: Arc<SqliteVectorCache>,
}

impl App {
    /// Fails when a configured provider cannot be built, e.g. an embedding
    /// provider kind with no embeddings API or a missing API key
    pub fn from_config(config: AppConfig) -> Result<Self, DomainError> {
        let reader = DirectoryReader::new(&config.documents.data_dir)
            .recursive(config.documents.recursive);
        let embedder = EmbeddingProviderFactory::create(&config.embedding)?;
        let llm = LlmProviderFactory::create(&config.llm)?;
        let cache = Arc::new(SqliteVectorCache::new(&config.cache.path));

        Ok(Self {
            config,
            reader,
            embedder,
            llm,
            cache,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Ingest the data directory and return an engine over the result
    pub async fn build_query_engine(&self) -> Result<RetrieverQueryEngine, DomainError> {
        let service = IngestionService::new(
            self.reader.clone(),
            self.embedder.clone(),
            self.cache.clone(),
        )
        .with_chunking(self.config.documents.chunking.clone());

        let index = service.build_index().await?;
        info!(nodes = index.len(), "Index ready");

        let query = &self.config.query;
        index
            .as_query_engine(self.llm.clone(), &self.config.llm.model)
            .with_top_k(query.top_k)
            .with_template(&query.prompt_template)
            .map(|engine| {
                engine
                    .with_temperature(self.config.llm.temperature)
                    .with_max_tokens(self.config.llm.max_tokens)
            })
    }

    /// Ingest, then run the question loop over the given streams
    pub async fn run<R: BufRead, W: Write>(&self, input: R, output: W) -> Result<(), DomainError> {
        let engine = self.build_query_engine().await?;
        cli::repl::run_query_loop(&engine, input, output).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::repl::{FAREWELL, PROMPT};
    use crate::config::ProviderKind;
    use serde_json::json;
    use std::fs;
    use std::io::Cursor;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn ollama_server() -> MockServer {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "bge-m3",
                "embeddings": [[0.6, 0.8]]
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "mistral",
                "created_at": "2024-05-01T10:00:00Z",
                "message": { "role": "assistant", "content": "Two years." },
                "done": true,
                "done_reason": "stop"
            })))
            .mount(&server)
            .await;

        server
    }

    fn config(server: &MockServer, data_dir: &std::path::Path, cache: &std::path::Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.documents.data_dir = data_dir.to_path_buf();
        config.cache.path = cache.to_path_buf();
        config.embedding.base_url = Some(server.uri());
        config.llm.base_url = Some(server.uri());
        config
    }

    #[tokio::test]
    async fn test_end_to_end_with_ollama() {
        let server = ollama_server().await;
        let data = tempfile::tempdir().unwrap();
        fs::write(data.path().join("terms.txt"), "The warranty lasts two (2) years.").unwrap();
        let db = tempfile::tempdir().unwrap();
        let cache_path = db.path().join("vectors.db");

        let app = App::from_config(config(&server, data.path(), &cache_path)).unwrap();

        let mut output = Vec::new();
        app.run(
            Cursor::new("How long is the warranty?\nquit\n".as_bytes()),
            &mut output,
        )
        .await
        .unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            format!("{p}Two years.\n{p}{f}\n", p = PROMPT, f = FAREWELL)
        );

        let requests = server.received_requests().await.unwrap();
        let chat = requests
            .iter()
            .find(|r| r.url.path() == "/api/chat")
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&chat.body).unwrap();
        let prompt = body["messages"][0]["content"].as_str().unwrap();
        assert!(prompt.contains("The warranty lasts two (2) years."));
        assert!(prompt.contains("Query: How long is the warranty?"));

        assert!(cache_path.exists());
    }

    #[test]
    fn test_anthropic_embeddings_are_not_supported() {
        let mut config = AppConfig::default();
        config.embedding.provider = ProviderKind::Anthropic;

        let err = App::from_config(config).unwrap_err();
        assert!(matches!(err, DomainError::NotSupported { .. }));
    }

    #[tokio::test]
    async fn test_missing_data_dir_fails_before_querying() {
        let server = ollama_server().await;
        let db = tempfile::tempdir().unwrap();
        let missing = db.path().join("no-such-dir");

        let app = App::from_config(config(&server, &missing, &db.path().join("v.db"))).unwrap();

        let mut output = Vec::new();
        let err = app
            .run(Cursor::new("quit\n".as_bytes()), &mut output)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert!(output.is_empty());
    }
}
