//! Bounded exponential backoff for remote operations

use crate::error::{BumpError, Result};
use std::time::Duration;
use tracing::warn;

/// How often and how patiently to retry a transient failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay after the first failed attempt
    pub initial_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Growth factor applied to the delay after each failure
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 5,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            multiplier: 2,
        }
    }
}

impl RetryPolicy {
    /// Policy that tries exactly once
    pub fn no_retry() -> Self {
        RetryPolicy {
            max_attempts: 1,
            ..RetryPolicy::default()
        }
    }

    /// Delay to wait after `attempt` (1-based) failed
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let factor = self.multiplier.max(1).saturating_pow(exponent);

        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Run `op` until it succeeds, fails with a non-transient error, or the
    /// attempts run out.
    ///
    /// The closure receives the 1-based attempt number. Running out of
    /// attempts yields [`BumpError::RetriesExhausted`].
    pub fn run<T, F>(&self, operation: &str, op: F) -> Result<T>
    where
        F: FnMut(u32) -> Result<T>,
    {
        self.run_with_sleep(operation, op, std::thread::sleep)
    }

    pub(crate) fn run_with_sleep<T, F, S>(
        &self,
        operation: &str,
        mut op: F,
        mut sleep: S,
    ) -> Result<T>
    where
        F: FnMut(u32) -> Result<T>,
        S: FnMut(Duration),
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) if attempt >= max_attempts => {
                    return Err(BumpError::RetriesExhausted {
                        operation: operation.to_string(),
                        attempts: attempt,
                        last_error: e.to_string(),
                    });
                }
                Err(e) => {
                    let delay = self.delay_after(attempt);
                    warn!(
                        operation,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "transient failure, retrying"
                    );
                    sleep(delay);
                    attempt += 1;
                }
            }
        }
    }
}
