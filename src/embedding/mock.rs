use super::client::QueryEmbedder;
use super::error::EmbeddingError;

/// Deterministic embedder for tests: same text, same vector.
#[derive(Debug, Clone)]
pub struct MockEmbedder {
    dimensions: usize,
}

impl MockEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self { dimensions: 384 }
    }
}

impl QueryEmbedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let seed = text
            .bytes()
            .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));

        let vector = (0..self.dimensions)
            .map(|i| {
                let mixed = seed.wrapping_add(i as u64).wrapping_mul(2654435761) % 1000;
                mixed as f32 / 1000.0
            })
            .collect();

        Ok(vector)
    }
}
