//! Breaker + retry composition around persistence calls.

use crate::config::AppConfig;
use crate::error::RepositoryError;
use crate::resilience::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerError, RetryPolicy};
use std::future::Future;
use std::sync::Arc;

/// Routes every persistence call through the shared database breaker.
///
/// Reads are additionally retried with backoff. Writes are attempted once
/// unless `retry_writes` is set.
#[derive(Debug, Clone)]
pub struct DatabaseGuard {
    breaker: Arc<CircuitBreaker>,
    retry: RetryPolicy,
    retry_writes: bool,
}

impl DatabaseGuard {
    pub fn new(breaker: Arc<CircuitBreaker>, retry: RetryPolicy, retry_writes: bool) -> Self {
        Self {
            breaker,
            retry,
            retry_writes,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let breaker = CircuitBreaker::new(
            "database".to_string(),
            CircuitBreakerConfig::from(&config.circuit_breaker),
        );
        Self::new(
            Arc::new(breaker),
            RetryPolicy::from(&config.retry),
            config.retry.retry_writes,
        )
    }

    pub fn breaker(&self) -> &Arc<CircuitBreaker> {
        &self.breaker
    }

    /// Run an idempotent persistence call with retry around the breaker
    pub async fn read<F, Fut, T>(
        &self,
        operation_name: &str,
        operation: F,
    ) -> Result<T, CircuitBreakerError<RepositoryError>>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, RepositoryError>>,
    {
        self.guarded(operation_name, operation, true).await
    }

    /// Run a mutating persistence call; retried only when configured
    pub async fn write<F, Fut, T>(
        &self,
        operation_name: &str,
        operation: F,
    ) -> Result<T, CircuitBreakerError<RepositoryError>>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, RepositoryError>>,
    {
        self.guarded(operation_name, operation, self.retry_writes)
            .await
    }

    async fn guarded<F, Fut, T>(
        &self,
        operation_name: &str,
        operation: F,
        retry: bool,
    ) -> Result<T, CircuitBreakerError<RepositoryError>>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, RepositoryError>>,
    {
        if !retry {
            return self.breaker.call(&operation).await;
        }

        let breaker = &self.breaker;
        let operation = &operation;
        self.retry
            .execute(
                operation_name,
                move || breaker.call(operation),
                is_retryable,
            )
            .await
    }
}

/// Only transient failures that actually reached the database are retried;
/// an open circuit is surfaced immediately
fn is_retryable(err: &CircuitBreakerError<RepositoryError>) -> bool {
    match err {
        CircuitBreakerError::OperationFailed(inner) => inner.is_transient(),
        CircuitBreakerError::CircuitOpen { .. } => false,
    }
}
