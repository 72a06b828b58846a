use std::sync::Arc;

use crate::audit::AuditClient;
use crate::pipeline::MatchPipeline;
use crate::trialstore::TrialStore;

/// Shared state handed to every handler.
pub struct HandlerState<S, C> {
    pub pipeline: Arc<MatchPipeline<S, C>>,
}

impl<S, C> HandlerState<S, C>
where
    S: TrialStore + 'static,
    C: AuditClient + 'static,
{
    pub fn new(pipeline: Arc<MatchPipeline<S, C>>) -> Self {
        Self { pipeline }
    }
}

// Manual impl: a derived Clone would demand S: Clone and C: Clone even
// though only the Arc is cloned.
impl<S, C> Clone for HandlerState<S, C> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}
