use thiserror::Error;

use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
/// Errors returned by trial store operations.
pub enum TrialStoreError {
    /// Could not connect to the Qdrant endpoint.
    #[error("failed to connect to Qdrant at '{url}': {message}")]
    ConnectionFailed {
        /// Endpoint URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// The query text could not be embedded.
    #[error("failed to embed query: {source}")]
    EmbeddingFailed {
        #[from]
        source: EmbeddingError,
    },
}
