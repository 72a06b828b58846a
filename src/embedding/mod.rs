//! Query embedding for similarity retrieval.
//!
//! The trial corpus is indexed offline by the ETL job; this module only
//! embeds incoming patient summaries so they can be searched against it.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use client::{HttpEmbedder, QueryEmbedder};
pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;
