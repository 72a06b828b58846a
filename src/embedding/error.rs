use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by query embedding operations.
pub enum EmbeddingError {
    /// The embeddings endpoint could not be reached.
    #[error("embedding request to '{url}' failed: {message}")]
    RequestFailed {
        /// Endpoint URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// The endpoint answered with a non-success status.
    #[error("embedding endpoint returned status {status}: {message}")]
    BadStatus {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode embedding response: {message}")]
    DecodeFailed {
        /// Error message.
        message: String,
    },

    /// The endpoint returned a vector of the wrong dimension.
    #[error("invalid embedding dimension: expected {expected}, got {actual}")]
    InvalidDimension {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// The endpoint returned no embedding for the input.
    #[error("embedding endpoint returned an empty data array")]
    EmptyResponse,
}
