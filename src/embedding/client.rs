use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::EmbeddingError;

/// Minimal async interface for turning query text into a vector.
pub trait QueryEmbedder: Send + Sync {
    /// Embeds a single piece of text.
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, EmbeddingError>> + Send;
}

/// Client for an OpenAI-compatible `/v1/embeddings` endpoint.
///
/// The trial corpus is indexed with a sentence-transformer model served over
/// HTTP; queries must be embedded with the same model for the similarity
/// search to be meaningful.
#[derive(Clone)]
pub struct HttpEmbedder {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    dimensions: usize,
}

#[derive(Serialize)]
struct EmbedRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}

impl HttpEmbedder {
    /// Creates an embedder for `endpoint` using `model`.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        dimensions: usize,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
            dimensions,
        }
    }

    /// Returns the configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the configured vector dimension.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn request_embedding(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let body = EmbedRequest {
            model: self.model.clone(),
            input: vec![text.to_string()],
        };

        let mut request = self.http.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EmbeddingError::RequestFailed {
                url: self.endpoint.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::BadStatus {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: EmbedResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::DecodeFailed {
                    message: e.to_string(),
                })?;

        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or(EmbeddingError::EmptyResponse)?;

        if embedding.len() != self.dimensions {
            return Err(EmbeddingError::InvalidDimension {
                expected: self.dimensions,
                actual: embedding.len(),
            });
        }

        debug!(dim = embedding.len(), "embedded query text");
        Ok(embedding)
    }
}

impl QueryEmbedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.request_embedding(text).await
    }
}
