//! Document ingestion: load, chunk, embed, persist, reload

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::ingestion::{ChunkingConfig, ChunkingStrategy, DocumentChunk};
use crate::domain::{DomainError, EmbeddingProvider, VectorCache, VectorMap};
use crate::infrastructure::index::VectorStoreIndex;
use crate::infrastructure::ingestion::{DirectoryReader, SentenceChunker};

/// Vectors as read back from the cache, plus the chunk texts they belong to
#[derive(Debug, Clone, Default)]
pub struct IngestedCorpus {
    pub vectors: VectorMap,
    pub texts: HashMap<String, String>,
    pub documents: usize,
}

/// Runs the ingestion pipeline against one data directory and one cache
pub struct IngestionService {
    reader: DirectoryReader,
    chunker: Arc<dyn ChunkingStrategy>,
    chunking: ChunkingConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    cache: Arc<dyn VectorCache>,
}

impl IngestionService {
    pub fn new(
        reader: DirectoryReader,
        embedder: Arc<dyn EmbeddingProvider>,
        cache: Arc<dyn VectorCache>,
    ) -> Self {
        Self {
            reader,
            chunker: Arc::new(SentenceChunker::new()),
            chunking: ChunkingConfig::default(),
            embedder,
            cache,
        }
    }

    pub fn with_chunking(mut self, chunking: ChunkingConfig) -> Self {
        self.chunking = chunking;
        self
    }

    pub fn with_chunker(mut self, chunker: Arc<dyn ChunkingStrategy>) -> Self {
        self.chunker = chunker;
        self
    }

    /// Load every document and split it into chunks
    pub async fn load_chunks(&self) -> Result<(usize, Vec<DocumentChunk>), DomainError> {
        let documents = self.reader.load().await?;
        let count = documents.len();
        let mut chunks = Vec::new();

        for document in documents {
            let pieces = self.chunker.chunk(&document.text, &self.chunking)?;
            debug!(
                document = %document.id,
                chunks = pieces.len(),
                strategy = self.chunker.name(),
                "Chunked document"
            );
            chunks.extend(document.into_chunks(pieces));
        }

        Ok((count, chunks))
    }

    /// Embed each chunk in order, one request per chunk
    pub async fn embed_chunks(&self, chunks: &[DocumentChunk]) -> Result<VectorMap, DomainError> {
        let mut vectors = VectorMap::with_capacity(chunks.len());

        for chunk in chunks {
            let vector = self.embedder.embed_text(&chunk.text).await?;
            vectors.insert(chunk.doc_id.clone(), vector);
        }

        info!(
            provider = self.embedder.provider_name(),
            model = self.embedder.model(),
            vectors = vectors.len(),
            "Computed embeddings"
        );

        Ok(vectors)
    }

    /// Full pipeline; the returned vectors are the ones reloaded from the cache
    pub async fn ingest(&self) -> Result<IngestedCorpus, DomainError> {
        let (documents, chunks) = self.load_chunks().await?;
        let vectors = self.embed_chunks(&chunks).await?;

        self.cache.initialize().await?;
        self.cache.upsert_all(&vectors).await?;
        let vectors = self.cache.load_all().await?;

        let texts = chunks
            .into_iter()
            .map(|chunk| (chunk.doc_id, chunk.text))
            .collect();

        info!(documents, vectors = vectors.len(), "Ingestion complete");

        Ok(IngestedCorpus {
            vectors,
            texts,
            documents,
        })
    }

    /// Ingest and build the retrieval index from the result
    pub async fn build_index(&self) -> Result<VectorStoreIndex, DomainError> {
        let corpus = self.ingest().await?;

        Ok(VectorStoreIndex::build(
            corpus.vectors,
            &corpus.texts,
            self.embedder.clone(),
        ))
    }
}
