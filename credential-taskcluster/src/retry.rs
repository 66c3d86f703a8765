//! Retry with exponential backoff for secrets requests.

use crate::error::TaskclusterError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Backoff settings.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_factor: f64,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            backoff_factor: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Returns the delay before retry number `attempt` (zero-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let exponential = self.base_delay.as_secs_f64() * self.backoff_factor.powi(attempt as i32);
        let capped = exponential.min(self.max_delay.as_secs_f64());

        let delay = if self.jitter {
            capped * (0.5 + fastrand::f64())
        } else {
            capped
        };

        Duration::from_secs_f64(delay)
    }
}

/// Runs `f` until it succeeds, fails with a non-retryable error, or runs out
/// of attempts.
pub async fn retry<F, Fut, T>(cfg: &RetryConfig, mut f: F) -> Result<T, TaskclusterError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TaskclusterError>>,
{
    let mut attempt = 0;

    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                attempt += 1;

                if !err.is_retryable() {
                    return Err(err);
                }

                if attempt >= cfg.max_attempts {
                    warn!(
                        error = %err,
                        attempt,
                        max_attempts = cfg.max_attempts,
                        "max retry attempts exhausted"
                    );
                    return Err(err);
                }

                let delay = cfg.delay(attempt - 1);
                warn!(
                    error = %err,
                    attempt,
                    max_attempts = cfg.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "retrying secrets request"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
