//! Qdrant-backed retrieval of clinical-trial eligibility documents.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;


pub use client::{QdrantTrialStore, TrialStore};
pub use error::TrialStoreError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockTrialStore;
pub use model::{
    PLACEHOLDER_NCT_ID, PLACEHOLDER_PHASE, PLACEHOLDER_TITLE, PLACEHOLDER_URL, TrialDocument,
};

use qdrant_client::qdrant::{Condition, Filter};

/// Typed predicate over trial metadata, applied during retrieval.
///
/// Evaluated server-side by Qdrant for the real store and in-process by the
/// mock; both read only the domestic-trial flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrialFilter {
    /// Restrict results to domestically recruiting trials.
    pub domestic_only: bool,
}

impl TrialFilter {
    /// Filter accepting only domestic trials.
    pub fn domestic_only() -> Self {
        Self {
            domestic_only: true,
        }
    }

    /// Returns `true` if `document` satisfies the filter.
    pub fn matches(&self, document: &TrialDocument) -> bool {
        !self.domestic_only || document.is_domestic
    }

    /// Converts the filter into its Qdrant payload-filter form.
    pub fn to_qdrant(&self) -> Option<Filter> {
        if self.domestic_only {
            Some(Filter::must([Condition::matches(
                "is_domestic_trial",
                true,
            )]))
        } else {
            None
        }
    }
}
