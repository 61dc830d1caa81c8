//! Retry with exponential backoff, cap and jitter.
//!
//! Only failures accepted by the caller's predicate are retried. The sleep
//! between attempts is the one point where dropping the returned future
//! cancels the whole operation without interrupting an in-flight attempt.

use crate::config::RetrySettings;
use crate::resilience::FailureClassification;
use std::future::Future;
use std::time::Duration;
use tracing::{error, warn};

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Additional attempts after the first (0 = a single attempt).
    pub max_retries: u32,
    /// Delay before the first retry (before jitter).
    pub base_delay: Duration,
    /// Cap applied to the exponential delay (before jitter).
    pub max_delay: Duration,
    /// Add a uniform random bonus of up to 50% on top of the capped delay.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            jitter: true,
        }
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            base_delay: Duration::from_millis(settings.base_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
            jitter: settings.jitter,
        }
    }
}

impl RetryPolicy {
    /// Policy that makes exactly one attempt
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (0-indexed).
    ///
    /// `base * 2^attempt`, capped at `max_delay`, then jitter on top.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        let capped = self.base_delay.saturating_mul(factor).min(self.max_delay);

        if self.jitter {
            capped + capped.mul_f64(fastrand::f64() * 0.5)
        } else {
            capped
        }
    }

    /// Run `operation`, retrying failures for which `is_retryable` holds.
    ///
    /// Returns the first success, the first non-retryable failure, or the
    /// last failure once `max_retries` retries are spent.
    pub async fn execute<F, Fut, T, E, P>(
        &self,
        operation_name: &str,
        mut operation: F,
        is_retryable: P,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
        P: Fn(&E) -> bool,
    {
        let mut attempt = 0u32;

        loop {
            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !is_retryable(&err) {
                return Err(err);
            }

            if attempt >= self.max_retries {
                if self.max_retries > 0 {
                    error!(
                        operation = operation_name,
                        attempts = attempt + 1,
                        error = %err,
                        "Retries exhausted"
                    );
                }
                return Err(err);
            }

            let delay = self.delay_for_attempt(attempt);
            attempt += 1;
            warn!(
                operation = operation_name,
                attempt = attempt,
                max_retries = self.max_retries,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Transient failure, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// [`execute`](Self::execute) with the error's own transient classification
    pub async fn execute_transient<F, Fut, T, E>(
        &self,
        operation_name: &str,
        operation: F,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: FailureClassification + std::fmt::Display,
    {
        self.execute(operation_name, operation, E::is_transient).await
    }
}
