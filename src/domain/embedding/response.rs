//! Vectors returned by an embedding model

/// One vector and its position in the request batch
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    index: usize,
    vector: Vec<f32>,
}

impl Embedding {
    pub fn new(index: usize, vector: Vec<f32>) -> Self {
        Self { index, vector }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    pub fn into_vector(self) -> Vec<f32> {
        self.vector
    }
}

/// Cosine of the angle between two vectors
///
/// Mismatched lengths, empty vectors and zero vectors score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let (dot, norm_a, norm_b) = a
        .iter()
        .zip(b)
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (x, y)| {
            (dot + x * y, na + x * x, nb + y * y)
        });

    let denominator = norm_a.sqrt() * norm_b.sqrt();
    if denominator == 0.0 {
        0.0
    } else {
        dot / denominator
    }
}

#[derive(Debug, Clone)]
pub struct EmbeddingResponse {
    model: String,
    embeddings: Vec<Embedding>,
    prompt_tokens: Option<u32>,
}

impl EmbeddingResponse {
    pub fn new(model: impl Into<String>, embeddings: Vec<Embedding>) -> Self {
        Self {
            model: model.into(),
            embeddings,
            prompt_tokens: None,
        }
    }

    pub fn with_prompt_tokens(mut self, tokens: u32) -> Self {
        self.prompt_tokens = Some(tokens);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn embeddings(&self) -> &[Embedding] {
        &self.embeddings
    }

    pub fn prompt_tokens(&self) -> Option<u32> {
        self.prompt_tokens
    }

    /// Vectors in request order, whatever order the server sent them in
    pub fn into_embeddings(mut self) -> Vec<Embedding> {
        self.embeddings.sort_by_key(Embedding::index);
        self.embeddings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_cosine_similarity() {
        assert!(close(cosine_similarity(&[0.6, 0.8], &[0.6, 0.8]), 1.0));
        assert!(close(cosine_similarity(&[1.0, 0.0], &[0.0, 3.0]), 0.0));
        assert!(close(cosine_similarity(&[2.0, 0.0], &[-1.0, 0.0]), -1.0));
        assert!(close(cosine_similarity(&[1.0, 1.0], &[1.0, 0.0]), std::f32::consts::FRAC_1_SQRT_2));
    }

    #[test]
    fn test_cosine_similarity_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_into_embeddings_restores_request_order() {
        let response = EmbeddingResponse::new(
            "text-embedding-3-small",
            vec![
                Embedding::new(2, vec![0.3]),
                Embedding::new(0, vec![0.1]),
                Embedding::new(1, vec![0.2]),
            ],
        );

        let vectors: Vec<Vec<f32>> = response
            .into_embeddings()
            .into_iter()
            .map(Embedding::into_vector)
            .collect();

        assert_eq!(vectors, vec![vec![0.1], vec![0.2], vec![0.3]]);
    }
}
