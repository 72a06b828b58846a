//! EndoMatch library crate (used by the server and integration tests).
//!
//! Screens a free-text patient case against a Qdrant corpus of
//! clinical-trial eligibility documents and audits each candidate with an
//! external reasoning service.
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`TrialDocument`], [`TrialFilter`] - Retrieved candidates and the
//!   metadata filter applied during retrieval
//! - [`AuditRequest`], [`AuditOutcome`] - Per-candidate audit input/output
//! - [`MatchPipeline`], [`MatchResponse`] - Fan-out/fan-in orchestration
//!
//! ## Clients
//! - [`QdrantTrialStore`] - Filtered top-K similarity retrieval
//! - [`HttpEmbedder`] - Query embedding over an OpenAI-compatible endpoint
//! - [`GenaiAuditClient`], [`RetryPolicy`] - Retry-protected reasoning calls
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod audit;
pub mod config;
pub mod embedding;
pub mod gateway;
pub mod pipeline;
pub mod trialstore;

pub use audit::{
    AUDIT_ERROR_MARKER, AuditClient, AuditError, AuditOutcome, AuditRequest, Auditor,
    GenaiAuditClient, MAX_ELIGIBILITY_CHARS, RetryPolicy,
};
#[cfg(any(test, feature = "mock"))]
pub use audit::MockAuditClient;

pub use config::{Config, ConfigError};

pub use embedding::{EmbeddingError, HttpEmbedder, QueryEmbedder};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;

pub use gateway::{HandlerState, create_router_with_state};

pub use pipeline::{MatchPipeline, MatchResponse, PipelineError};

pub use trialstore::{
    PLACEHOLDER_NCT_ID, PLACEHOLDER_PHASE, PLACEHOLDER_TITLE, PLACEHOLDER_URL, QdrantTrialStore,
    TrialDocument, TrialFilter, TrialStore, TrialStoreError,
};
#[cfg(any(test, feature = "mock"))]
pub use trialstore::MockTrialStore;
