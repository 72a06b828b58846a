use thiserror::Error;

use crate::trialstore::TrialStoreError;

#[derive(Debug, Error)]
/// Request-level pipeline failures.
///
/// Candidate-level audit failures never appear here; they are absorbed into
/// the per-candidate outcome.
pub enum PipelineError {
    /// The trial store is not initialized or reachable. Fatal to the
    /// request; no partial response is possible.
    #[error("trial store is unavailable")]
    StoreUnavailable,

    /// Retrieval failed before any audit was dispatched.
    #[error("candidate retrieval failed: {source}")]
    RetrievalFailed {
        #[from]
        source: TrialStoreError,
    },
}
