use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::client::AuditClient;
use super::error::AuditError;
use super::request::AuditRequest;

/// Scriptable reasoning-service double.
///
/// Behavior is keyed by the trial's `nct_id`: fixed responses, failure
/// sequences, and artificial latency for ordering tests. Unknown trials get
/// an UNCERTAIN verdict so tests only script what they assert on.
#[derive(Clone, Default)]
pub struct MockAuditClient {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    scripts: Mutex<HashMap<String, Script>>,
    calls: Mutex<Vec<String>>,
}

#[derive(Default)]
struct Script {
    delay: Option<Duration>,
    queue: VecDeque<Result<String, AuditError>>,
    steady: Option<Result<String, AuditError>>,
}

impl MockAuditClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call for `nct_id` succeeds with `verdict`.
    pub fn respond_with(&self, nct_id: &str, verdict: &str) {
        self.with_script(nct_id, |script| {
            script.steady = Some(Ok(verdict.to_string()));
        });
    }

    /// Every call for `nct_id` fails with `error`.
    pub fn fail_with(&self, nct_id: &str, error: AuditError) {
        self.with_script(nct_id, |script| {
            script.steady = Some(Err(error));
        });
    }

    /// The next `failures` calls for `nct_id` fail in order, then calls
    /// succeed with `verdict`.
    pub fn fail_then_succeed(&self, nct_id: &str, failures: Vec<AuditError>, verdict: &str) {
        self.with_script(nct_id, |script| {
            script.queue = failures.into_iter().map(Err).collect();
            script.steady = Some(Ok(verdict.to_string()));
        });
    }

    /// Delays every call for `nct_id` by `delay`.
    pub fn delay(&self, nct_id: &str, delay: Duration) {
        self.with_script(nct_id, |script| {
            script.delay = Some(delay);
        });
    }

    /// Number of calls issued for `nct_id`.
    pub fn call_count(&self, nct_id: &str) -> usize {
        self.inner
            .calls
            .lock()
            .expect("mock audit lock poisoned")
            .iter()
            .filter(|id| id.as_str() == nct_id)
            .count()
    }

    /// Total calls issued across all trials.
    pub fn total_calls(&self) -> usize {
        self.inner
            .calls
            .lock()
            .expect("mock audit lock poisoned")
            .len()
    }

    fn with_script(&self, nct_id: &str, f: impl FnOnce(&mut Script)) {
        let mut scripts = self
            .inner
            .scripts
            .lock()
            .expect("mock audit lock poisoned");
        f(scripts.entry(nct_id.to_string()).or_default());
    }
}

impl AuditClient for MockAuditClient {
    async fn call(&self, request: &AuditRequest) -> Result<String, AuditError> {
        let nct_id = request.trial.nct_id.clone();

        self.inner
            .calls
            .lock()
            .expect("mock audit lock poisoned")
            .push(nct_id.clone());

        // Resolve the scripted step under the lock, then release it before
        // sleeping so concurrent calls do not serialize.
        let (delay, step) = {
            let mut scripts = self
                .inner
                .scripts
                .lock()
                .expect("mock audit lock poisoned");

            match scripts.get_mut(&nct_id) {
                Some(script) => {
                    let step = script
                        .queue
                        .pop_front()
                        .or_else(|| script.steady.clone());
                    (script.delay, step)
                }
                None => (None, None),
            }
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        step.unwrap_or_else(|| Ok(format!("UNCERTAIN. No scripted verdict for {}.", nct_id)))
    }
}
