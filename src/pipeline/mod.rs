//! Fan-out/fan-in orchestration of the eligibility audit pipeline.
//!
//! One retrieval call, then one concurrent audit task per candidate, joined
//! into a response ordered by retrieval rank. Total latency is bounded by
//! the slowest single audit (including its retries), not by the sum.

pub mod error;


pub use error::PipelineError;

use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::audit::{AuditClient, AuditOutcome, Auditor};
use crate::trialstore::{TrialFilter, TrialStore};

/// Ordered terminal artifact of one match request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResponse {
    /// One outcome per retrieved candidate, in retrieval-rank order.
    pub matches: Vec<AuditOutcome>,
}

/// Orchestrates retrieval and concurrent audits for one patient case.
///
/// Store and auditor are constructor-injected so tests can substitute
/// deterministic doubles; the pipeline itself holds no mutable state.
pub struct MatchPipeline<S, C> {
    store: Arc<S>,
    auditor: Arc<Auditor<C>>,
    top_k: u64,
    filter: TrialFilter,
}

impl<S, C> MatchPipeline<S, C>
where
    S: TrialStore,
    C: AuditClient + 'static,
{
    /// Creates a pipeline retrieving up to `top_k` domestic candidates.
    pub fn new(store: Arc<S>, auditor: Arc<Auditor<C>>, top_k: u64) -> Self {
        Self {
            store,
            auditor,
            top_k,
            filter: TrialFilter::domestic_only(),
        }
    }

    /// Returns whether the underlying trial store can serve requests.
    pub async fn is_store_ready(&self) -> bool {
        self.store.is_ready().await
    }

    /// Screens `patient_summary` against the corpus.
    ///
    /// Exactly one [`AuditOutcome`] is produced per retrieved candidate,
    /// positioned by retrieval rank regardless of audit completion order. A
    /// single candidate's failure (exhausted retries, permanent provider
    /// error, even a panicked task) is absorbed into that candidate's
    /// outcome and never aborts its siblings.
    #[instrument(skip(self, patient_summary))]
    pub async fn match_patient(
        &self,
        patient_summary: &str,
    ) -> Result<MatchResponse, PipelineError> {
        if !self.store.is_ready().await {
            return Err(PipelineError::StoreUnavailable);
        }

        let candidates = self
            .store
            .retrieve(patient_summary, self.top_k, &self.filter)
            .await?;

        info!(candidates = candidates.len(), "fanning out audit tasks");

        let mut handles = Vec::with_capacity(candidates.len());
        for trial in candidates {
            let auditor = Arc::clone(&self.auditor);
            let summary = patient_summary.to_string();
            // Kept outside the task so a panicked audit can still be
            // attributed to its candidate at the join.
            let join_fallback = trial.clone();
            let handle = tokio::spawn(async move { auditor.audit(&summary, trial).await });
            handles.push((join_fallback, handle));
        }

        // Joining in spawn order pins every outcome to its retrieval rank;
        // completion order is irrelevant.
        let mut matches = Vec::with_capacity(handles.len());
        for (trial, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(join_error) => {
                    error!(
                        nct_id = %trial.nct_id,
                        error = %join_error,
                        "audit task aborted, synthesizing failure outcome"
                    );
                    AuditOutcome::failure(&trial, &format!("audit task aborted: {}", join_error))
                }
            };
            matches.push(outcome);
        }

        Ok(MatchResponse { matches })
    }
}
