use tracing::warn;

use super::client::AuditClient;
use super::request::{AuditOutcome, AuditRequest};
use super::retry::RetryPolicy;
use crate::trialstore::TrialDocument;

/// Drives one candidate's audit to a terminal outcome.
///
/// This is the failure-isolation boundary of the pipeline: `audit` has an
/// infallible signature, so nothing a single candidate does can abort its
/// siblings or the request.
pub struct Auditor<C> {
    client: C,
    policy: RetryPolicy,
}

impl<C: AuditClient> Auditor<C> {
    pub fn new(client: C, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Returns the retry policy in force.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Audits `trial` against `patient_summary`.
    ///
    /// The reasoning service is not deterministic even at temperature zero;
    /// two calls with identical inputs are independent and results are never
    /// cached.
    pub async fn audit(&self, patient_summary: &str, trial: TrialDocument) -> AuditOutcome {
        let request = AuditRequest::new(patient_summary, trial);

        match self.policy.run(|| self.client.call(&request)).await {
            Ok(verdict) => AuditOutcome::success(&request.trial, verdict),
            Err(error) => {
                warn!(
                    nct_id = %request.trial.nct_id,
                    error = %error,
                    "audit failed after retries, synthesizing failure outcome"
                );
                AuditOutcome::failure(&request.trial, &error.to_string())
            }
        }
    }
}
