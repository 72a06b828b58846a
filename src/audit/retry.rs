use std::time::Duration;

use tracing::debug;

use super::error::AuditError;

/// Caps the backoff exponent so the multiplication cannot overflow.
const MAX_BACKOFF_EXPONENT: u32 = 16;

/// Exponential-backoff retry policy for reasoning-service calls.
///
/// Only transient failures are retried; a permanent failure or exhausted
/// attempt budget surfaces the last error to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Must be at least 1.
    pub max_attempts: u32,
    /// Backoff multiplier: the wait before attempt `n` is
    /// `base * 2^(n-1)`, clamped to `[min_wait, max_wait]`.
    pub base: Duration,
    /// Lower clamp on the wait between attempts.
    pub min_wait: Duration,
    /// Upper clamp on the wait between attempts.
    pub max_wait: Duration,
}

impl Default for RetryPolicy {
    /// Five attempts with waits of 2s, 4s, 8s, 10s.
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base: Duration::from_secs(1),
            min_wait: Duration::from_secs(2),
            max_wait: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// A millisecond-scale policy with the same shape, for tests.
    pub fn fast() -> Self {
        Self {
            max_attempts: 5,
            base: Duration::from_millis(1),
            min_wait: Duration::from_millis(2),
            max_wait: Duration::from_millis(10),
        }
    }

    /// Returns the wait before attempt `attempt` (attempts are 1-based, so
    /// `attempt >= 2` here).
    pub fn wait_before(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(MAX_BACKOFF_EXPONENT);
        let wait = self.base.saturating_mul(1u32 << exponent);
        wait.clamp(self.min_wait, self.max_wait)
    }

    /// Drives `op` to a terminal outcome under this policy.
    ///
    /// Retries only transient errors, sleeping between attempts. Permanent
    /// errors and budget exhaustion return the last error unchanged.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, AuditError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, AuditError>>,
    {
        let mut attempt = 1u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_transient() && attempt < self.max_attempts => {
                    let wait = self.wait_before(attempt + 1);
                    debug!(
                        attempt,
                        wait_ms = wait.as_millis() as u64,
                        error = %error,
                        "transient audit failure, backing off"
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}
