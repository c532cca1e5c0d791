use rand::{Rng, rng};
use std::time::Duration;

use crate::GarminError;

/// Exponential backoff with jitter for transient provider failures.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    /// Run `f` until it succeeds, fails with a non-retryable error, or the
    /// retry budget is spent.
    pub async fn retry_async<F, Fut, T>(&self, operation: &str, mut f: F) -> Result<T, GarminError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, GarminError>>,
    {
        let mut attempt = 0u32;
        loop {
            match f().await {
                Ok(v) => return Ok(v),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries || !e.is_retryable() {
                        return Err(e);
                    }
                    let delay = self.backoff(attempt);
                    tracing::debug!(
                        operation,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying garmin request"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let max_delay = self.base_delay * (1u32 << attempt.min(16));
        let max_ms = max_delay.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        let jitter = rng().random_range(0..max_ms);
        Duration::from_millis(jitter)
    }
}
