use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use super::TrialFilter;
use super::client::TrialStore;
use super::error::TrialStoreError;
use super::model::TrialDocument;

/// In-memory trial store for tests.
///
/// Documents are returned in seed order, which stands in for retrieval rank.
pub struct MockTrialStore {
    documents: RwLock<Vec<TrialDocument>>,
    available: AtomicBool,
}

impl Default for MockTrialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTrialStore {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Appends a document at the next retrieval rank.
    pub fn seed(&self, document: TrialDocument) {
        self.documents
            .write()
            .expect("mock store lock poisoned")
            .push(document);
    }

    /// Flips the availability switch reported by `is_ready`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn document_count(&self) -> usize {
        self.documents
            .read()
            .expect("mock store lock poisoned")
            .len()
    }
}

impl TrialStore for MockTrialStore {
    async fn is_ready(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn retrieve(
        &self,
        _query: &str,
        limit: u64,
        filter: &TrialFilter,
    ) -> Result<Vec<TrialDocument>, TrialStoreError> {
        if !self.available.load(Ordering::SeqCst) {
            return Ok(Vec::new());
        }

        let documents = self.documents.read().expect("mock store lock poisoned");

        Ok(documents
            .iter()
            .filter(|d| filter.matches(d))
            .take(limit as usize)
            .cloned()
            .collect())
    }
}
