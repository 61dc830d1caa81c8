//! # Resilience Module
//!
//! Fault tolerance for the database path: a circuit breaker that fails fast
//! under sustained backend failure, and a retry policy with exponential
//! backoff for transient errors.
//!
//! ## Architecture
//!
//! - **Circuit Breaker**: isolates the database after repeated transient failures
//! - **Retry Policy**: bounded, jittered exponential backoff
//! - **Database Guard**: composes the two around a single persistence call
//! - **Failure Classification**: only failures that report themselves as
//!   transient count against the breaker or are retried
//!
//! ## Usage
//!
//! ```rust,no_run
//! use private_markets::resilience::{CircuitBreaker, CircuitBreakerConfig};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CircuitBreakerConfig {
//!     failure_threshold: 5,
//!     recovery_timeout: Duration::from_secs(30),
//! };
//!
//! let circuit_breaker = CircuitBreaker::new("database".to_string(), config);
//!
//! let result = circuit_breaker
//!     .call_with_predicate(|| async { Ok::<&str, String>("success") }, |_| true)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod circuit_breaker;
pub mod config;
pub mod guard;
pub mod retry;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerError, CircuitBreakerStatus, CircuitState};
pub use config::CircuitBreakerConfig;
pub use guard::DatabaseGuard;
pub use retry::RetryPolicy;

/// Decides whether a failure says something about the health of the
/// protected resource.
///
/// Transient failures count toward opening the breaker and are eligible for
/// retry. Anything else passes through both untouched.
pub trait FailureClassification {
    fn is_transient(&self) -> bool;
}
