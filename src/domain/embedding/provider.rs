//! Text to vector

use std::fmt::Debug;

use async_trait::async_trait;

use super::{Embedding, EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

/// The one capability ingestion and retrieval need from an embedding model
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError>;

    fn provider_name(&self) -> &'static str;

    /// Model this provider was configured with
    fn model(&self) -> &str;

    /// Vector length of the configured model, if the provider knows it
    fn dimensions(&self) -> Option<usize> {
        None
    }

    /// One text through the configured model
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let request = EmbeddingRequest::single(self.model(), text);
        let response = self.embed(request).await?;

        response
            .into_embeddings()
            .into_iter()
            .next()
            .map(Embedding::into_vector)
            .ok_or_else(|| {
                DomainError::provider(self.provider_name(), "Response contained no embedding")
            })
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Same text, same vector; no network
    #[derive(Debug)]
    pub struct MockEmbeddingProvider {
        dimensions: usize,
        failure: Option<String>,
        fixed: Vec<(String, Vec<f32>)>,
        calls: Mutex<Vec<String>>,
    }

    impl MockEmbeddingProvider {
        pub fn new(dimensions: usize) -> Self {
            Self {
                dimensions,
                failure: None,
                fixed: Vec::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn with_error(self, failure: impl Into<String>) -> Self {
            Self {
                failure: Some(failure.into()),
                ..self
            }
        }

        /// Return `vector` whenever the input text equals `text`
        pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
            self.fixed.push((text.into(), vector));
            self
        }

        /// Texts embedded so far, in call order
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn vector_for(&self, text: &str) -> Vec<f32> {
            if let Some((_, vector)) = self.fixed.iter().find(|(known, _)| known == text) {
                return vector.clone();
            }

            let seed: u64 = text.bytes().map(u64::from).sum();
            (0..self.dimensions as u64)
                .map(|i| (seed.wrapping_mul(31).wrapping_add(i * 7) % 997) as f32 / 997.0 - 0.5)
                .collect()
        }
    }

    #[async_trait]
    impl EmbeddingProvider for MockEmbeddingProvider {
        async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
            if let Some(failure) = &self.failure {
                return Err(DomainError::provider("mock", failure.clone()));
            }

            let texts = request.inputs();
            self.calls
                .lock()
                .unwrap()
                .extend(texts.iter().map(|text| text.to_string()));

            let embeddings = texts
                .into_iter()
                .enumerate()
                .map(|(index, text)| Embedding::new(index, self.vector_for(text)))
                .collect();

            Ok(EmbeddingResponse::new(request.model().to_string(), embeddings))
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }

        fn model(&self) -> &str {
            "mock-embedding"
        }

        fn dimensions(&self) -> Option<usize> {
            Some(self.dimensions)
        }
    }

    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_embed_text_returns_first_vector() {
            let provider = MockEmbeddingProvider::new(8);

            let vector = provider.embed_text("Hello").await.unwrap();

            assert_eq!(vector.len(), 8);
            assert_eq!(provider.calls(), vec!["Hello".to_string()]);
        }

        #[tokio::test]
        async fn test_fixed_vectors_win() {
            let provider = MockEmbeddingProvider::new(3).with_vector("x", vec![1.0, 0.0, 0.0]);

            assert_eq!(provider.embed_text("x").await.unwrap(), vec![1.0, 0.0, 0.0]);
        }

        #[tokio::test]
        async fn test_same_text_same_vector() {
            let provider = MockEmbeddingProvider::new(16);

            let a = provider.embed_text("same text").await.unwrap();
            let b = provider.embed_text("same text").await.unwrap();

            assert_eq!(a, b);
        }

        #[tokio::test]
        async fn test_error_propagates() {
            let provider = MockEmbeddingProvider::new(4).with_error("model not loaded");

            let result = provider.embed_text("Hello").await;

            assert!(matches!(result, Err(DomainError::Provider { .. })));
        }
    }
}
