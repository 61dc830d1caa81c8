//! # Circuit Breaker Implementation
//!
//! Classic three-state breaker: Closed (normal operation), Open (failing
//! fast) and Half-Open (a single probe call tests recovery).
//!
//! The Open → Half-Open transition is derived from the time elapsed since the
//! last failure every time the state is read. There is no background timer.

use crate::resilience::{CircuitBreakerConfig, FailureClassification};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Circuit breaker states representing the current operational mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    /// Normal operation - all calls are allowed through
    Closed,
    /// Failure mode - all calls fail fast without executing
    Open,
    /// Testing recovery - exactly one probe call is allowed through
    HalfOpen,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Open => write!(f, "open"),
            Self::HalfOpen => write!(f, "half_open"),
        }
    }
}

/// Errors that can occur during circuit breaker operation
#[derive(Debug, thiserror::Error)]
pub enum CircuitBreakerError<E> {
    /// Circuit is open; the operation was not invoked
    #[error("Circuit breaker is open for {component}")]
    CircuitOpen {
        component: String,
        retry_after: Duration,
    },

    /// Operation ran and failed
    #[error("Operation failed: {0}")]
    OperationFailed(E),
}

/// Point-in-time view of a breaker for health reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitBreakerStatus {
    pub name: String,
    pub state: CircuitState,
    pub failure_count: u32,
    pub failure_threshold: u32,
    pub success_count: u64,
    pub recovery_timeout_seconds: f64,
}

#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    failure_count: u32,
    last_failure_time: Option<Instant>,
    success_count: u64,
    /// Set while the single Half-Open probe is running
    probe_in_flight: bool,
}

/// Clears the probe flag if the probe future is dropped before completing
struct ProbeGuard<'a> {
    inner: &'a Mutex<BreakerState>,
    armed: bool,
}

impl Drop for ProbeGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.inner.lock().probe_in_flight = false;
        }
    }
}

/// Core circuit breaker implementation
#[derive(Debug)]
pub struct CircuitBreaker {
    /// Component name for logging and health reporting
    name: String,

    config: CircuitBreakerConfig,

    /// All mutable state behind one lock so every transition is atomic
    inner: Mutex<BreakerState>,
}

impl CircuitBreaker {
    pub fn new(name: String, config: CircuitBreakerConfig) -> Self {
        info!(
            component = %name,
            failure_threshold = config.failure_threshold,
            recovery_timeout_seconds = config.recovery_timeout.as_secs_f64(),
            "🛡️ Circuit breaker initialized"
        );

        Self {
            name,
            config,
            inner: Mutex::new(BreakerState {
                state: CircuitState::Closed,
                failure_count: 0,
                last_failure_time: None,
                success_count: 0,
                probe_in_flight: false,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Current state, promoting Open to Half-Open once the recovery timeout
    /// has elapsed since the last failure
    pub fn state(&self) -> CircuitState {
        let mut inner = self.inner.lock();
        self.resolve(&mut inner, Instant::now())
    }

    /// Execute an operation, counting only transient failures against the circuit
    pub async fn call<F, T, E, Fut>(&self, operation: F) -> Result<T, CircuitBreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: FailureClassification,
    {
        self.call_with_predicate(operation, E::is_transient).await
    }

    /// Execute an operation with circuit breaker protection.
    ///
    /// `counts_as_failure` decides which errors affect breaker state. Errors
    /// it rejects are returned unchanged and leave the counters alone.
    pub async fn call_with_predicate<F, T, E, Fut, P>(
        &self,
        operation: F,
        counts_as_failure: P,
    ) -> Result<T, CircuitBreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
    {
        let is_probe = self.admit()?;
        let mut probe = ProbeGuard {
            inner: &self.inner,
            armed: is_probe,
        };

        let start_time = Instant::now();
        let result = operation().await;
        let duration = start_time.elapsed();

        probe.armed = false;
        let mut inner = self.inner.lock();
        if is_probe {
            inner.probe_in_flight = false;
        }

        match &result {
            Ok(_) => self.record_success(&mut inner, duration, is_probe),
            Err(err) if counts_as_failure(err) => self.record_failure(&mut inner, duration),
            Err(_) => {
                debug!(
                    component = %self.name,
                    duration_ms = duration.as_millis() as u64,
                    "Operation failed with unclassified error, circuit unaffected"
                );
            }
        }
        drop(inner);

        result.map_err(CircuitBreakerError::OperationFailed)
    }

    pub fn status(&self) -> CircuitBreakerStatus {
        let mut inner = self.inner.lock();
        let state = self.resolve(&mut inner, Instant::now());

        CircuitBreakerStatus {
            name: self.name.clone(),
            state,
            failure_count: inner.failure_count,
            failure_threshold: self.config.failure_threshold,
            success_count: inner.success_count,
            recovery_timeout_seconds: self.config.recovery_timeout.as_secs_f64(),
        }
    }

    /// Decide whether a call may proceed; `Ok(true)` marks it as the Half-Open probe
    fn admit<E>(&self) -> Result<bool, CircuitBreakerError<E>> {
        let now = Instant::now();
        let mut inner = self.inner.lock();

        match self.resolve(&mut inner, now) {
            CircuitState::Closed => Ok(false),
            CircuitState::Open => {
                let retry_after = self.retry_after(&inner, now);
                debug!(
                    component = %self.name,
                    retry_after_ms = retry_after.as_millis() as u64,
                    "Circuit open, rejecting call"
                );
                Err(CircuitBreakerError::CircuitOpen {
                    component: self.name.clone(),
                    retry_after,
                })
            }
            CircuitState::HalfOpen if inner.probe_in_flight => {
                debug!(component = %self.name, "Probe already in flight, rejecting call");
                Err(CircuitBreakerError::CircuitOpen {
                    component: self.name.clone(),
                    retry_after: Duration::ZERO,
                })
            }
            CircuitState::HalfOpen => {
                inner.probe_in_flight = true;
                Ok(true)
            }
        }
    }

    fn resolve(&self, inner: &mut BreakerState, now: Instant) -> CircuitState {
        if inner.state == CircuitState::Open {
            let cooled_down = inner.last_failure_time.map_or(true, |last| {
                now.saturating_duration_since(last) >= self.config.recovery_timeout
            });

            if cooled_down {
                inner.state = CircuitState::HalfOpen;
                inner.probe_in_flight = false;
                info!(
                    component = %self.name,
                    failure_count = inner.failure_count,
                    "🟡 Circuit breaker half-open (testing recovery)"
                );
            }
        }
        inner.state
    }

    fn retry_after(&self, inner: &BreakerState, now: Instant) -> Duration {
        let elapsed = inner
            .last_failure_time
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(self.config.recovery_timeout);
        self.config.recovery_timeout.saturating_sub(elapsed)
    }

    /// Any success while Half-Open closes the circuit. `was_probe` marks the
    /// Half-Open probe, whose success also closes a circuit that a straggling
    /// failure re-opened while the probe ran.
    fn record_success(&self, inner: &mut BreakerState, duration: Duration, was_probe: bool) {
        let state = self.resolve(inner, Instant::now());
        inner.success_count += 1;

        let recovered = match state {
            CircuitState::HalfOpen => true,
            CircuitState::Open => was_probe,
            CircuitState::Closed => false,
        };

        if recovered {
            inner.state = CircuitState::Closed;
            inner.failure_count = 0;
            inner.last_failure_time = None;
            info!(
                component = %self.name,
                success_count = inner.success_count,
                "🟢 Circuit breaker closed (recovered)"
            );
        } else if state == CircuitState::Closed {
            inner.failure_count = 0;
            debug!(
                component = %self.name,
                duration_ms = duration.as_millis() as u64,
                "Operation succeeded"
            );
        } else {
            // Admitted before the circuit opened
            warn!(component = %self.name, "Success recorded while circuit is open");
        }
    }

    fn record_failure(&self, inner: &mut BreakerState, duration: Duration) {
        let now = Instant::now();
        let state = self.resolve(inner, now);
        inner.failure_count = inner.failure_count.saturating_add(1);
        inner.last_failure_time = Some(now);

        match state {
            CircuitState::Closed if inner.failure_count >= self.config.failure_threshold => {
                inner.state = CircuitState::Open;
                error!(
                    component = %self.name,
                    failure_count = inner.failure_count,
                    failure_threshold = self.config.failure_threshold,
                    recovery_timeout_seconds = self.config.recovery_timeout.as_secs_f64(),
                    "🔴 Circuit breaker opened (failing fast)"
                );
            }
            CircuitState::Closed => {
                warn!(
                    component = %self.name,
                    failure_count = inner.failure_count,
                    failure_threshold = self.config.failure_threshold,
                    duration_ms = duration.as_millis() as u64,
                    "Operation failed"
                );
            }
            CircuitState::HalfOpen => {
                inner.state = CircuitState::Open;
                inner.failure_count = inner.failure_count.max(self.config.failure_threshold);
                error!(
                    component = %self.name,
                    failure_count = inner.failure_count,
                    "🔴 Circuit breaker re-opened (probe failed)"
                );
            }
            CircuitState::Open => {
                debug!(
                    component = %self.name,
                    failure_count = inner.failure_count,
                    "Failure recorded while circuit is open"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Debug, PartialEq)]
    enum TestError {
        Transient,
        Permanent,
    }

    impl FailureClassification for TestError {
        fn is_transient(&self) -> bool {
            matches!(self, TestError::Transient)
        }
    }

    fn breaker(threshold: u32, recovery_secs: u64) -> CircuitBreaker {
        CircuitBreaker::new(
            "test".to_string(),
            CircuitBreakerConfig {
                failure_threshold: threshold,
                recovery_timeout: Duration::from_secs(recovery_secs),
            },
        )
    }

    async fn fail(circuit: &CircuitBreaker) {
        let _ = circuit
            .call(|| async { Err::<(), _>(TestError::Transient) })
            .await;
    }

    #[tokio::test]
    async fn test_circuit_breaker_normal_operation() {
        let circuit = breaker(3, 30);
        assert_eq!(circuit.state(), CircuitState::Closed);

        let result = circuit
            .call(|| async { Ok::<_, TestError>("success") })
            .await;
        assert_eq!(result.ok(), Some("success"));

        let status = circuit.status();
        assert_eq!(status.success_count, 1);
        assert_eq!(status.failure_count, 0);
    }

    #[tokio::test]
    async fn test_circuit_breaker_opens_on_failures() {
        let circuit = breaker(2, 30);

        fail(&circuit).await;
        assert_eq!(circuit.state(), CircuitState::Closed);

        fail(&circuit).await;
        assert_eq!(circuit.state(), CircuitState::Open);

        let invoked = AtomicU32::new(0);
        let result = circuit
            .call(|| async {
                invoked.fetch_add(1, Ordering::SeqCst);
                Ok::<_, TestError>("should not execute")
            })
            .await;
        assert!(matches!(result, Err(CircuitBreakerError::CircuitOpen { .. })));
        assert_eq!(invoked.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_success_resets_failure_count() {
        let circuit = breaker(3, 30);
        fail(&circuit).await;
        fail(&circuit).await;
        assert_eq!(circuit.status().failure_count, 2);

        let _ = circuit.call(|| async { Ok::<_, TestError>(()) }).await;
        assert_eq!(circuit.status().failure_count, 0);

        fail(&circuit).await;
        fail(&circuit).await;
        assert_eq!(circuit.state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_unclassified_failures_do_not_count() {
        let circuit = breaker(1, 30);

        let result = circuit
            .call(|| async { Err::<(), _>(TestError::Permanent) })
            .await;
        assert!(matches!(
            result,
            Err(CircuitBreakerError::OperationFailed(TestError::Permanent))
        ));
        assert_eq!(circuit.state(), CircuitState::Closed);
        assert_eq!(circuit.status().failure_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_after_counts_down() {
        let circuit = breaker(1, 30);
        fail(&circuit).await;

        tokio::time::advance(Duration::from_secs(10)).await;
        let result = circuit.call(|| async { Ok::<_, TestError>(()) }).await;
        match result {
            Err(CircuitBreakerError::CircuitOpen {
                component,
                retry_after,
            }) => {
                assert_eq!(component, "test");
                assert_eq!(retry_after, Duration::from_secs(20));
            }
            other => panic!("expected circuit open, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_circuit_breaker_recovery() {
        let circuit = breaker(1, 30);
        fail(&circuit).await;
        assert_eq!(circuit.state(), CircuitState::Open);

        tokio::time::advance(Duration::from_secs(29)).await;
        assert_eq!(circuit.state(), CircuitState::Open);

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(circuit.state(), CircuitState::HalfOpen);

        let result = circuit.call(|| async { Ok::<_, TestError>("probe") }).await;
        assert!(result.is_ok());
        assert_eq!(circuit.state(), CircuitState::Closed);
        assert_eq!(circuit.status().failure_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_probe_reopens() {
        let circuit = breaker(2, 30);
        fail(&circuit).await;
        fail(&circuit).await;

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(circuit.state(), CircuitState::HalfOpen);

        fail(&circuit).await;
        assert_eq!(circuit.state(), CircuitState::Open);
        assert!(circuit.status().failure_count >= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_half_open_admits_single_probe() {
        let circuit = Arc::new(breaker(1, 5));
        fail(&circuit).await;
        tokio::time::advance(Duration::from_secs(5)).await;

        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();
        let probe_circuit = Arc::clone(&circuit);
        let probe = tokio::spawn(async move {
            probe_circuit
                .call(|| async move {
                    let _ = release_rx.await;
                    Ok::<_, TestError>("probe")
                })
                .await
        });
        tokio::task::yield_now().await;

        let second = circuit.call(|| async { Ok::<_, TestError>("second") }).await;
        assert!(matches!(second, Err(CircuitBreakerError::CircuitOpen { .. })));

        let _ = release_tx.send(());
        let probe_result = probe.await.expect("probe task panicked");
        assert!(probe_result.is_ok());
        assert_eq!(circuit.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_success_closes_after_straggler_failure() {
        let circuit = Arc::new(breaker(1, 5));

        let (straggler_tx, straggler_rx) = tokio::sync::oneshot::channel::<()>();
        let straggler_circuit = Arc::clone(&circuit);
        let straggler = tokio::spawn(async move {
            straggler_circuit
                .call(|| async move {
                    let _ = straggler_rx.await;
                    Err::<(), _>(TestError::Transient)
                })
                .await
        });
        tokio::task::yield_now().await;

        fail(&circuit).await;
        assert_eq!(circuit.state(), CircuitState::Open);
        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(circuit.state(), CircuitState::HalfOpen);

        let (probe_tx, probe_rx) = tokio::sync::oneshot::channel::<()>();
        let probe_circuit = Arc::clone(&circuit);
        let probe = tokio::spawn(async move {
            probe_circuit
                .call(|| async move {
                    let _ = probe_rx.await;
                    Ok::<_, TestError>("probe")
                })
                .await
        });
        tokio::task::yield_now().await;

        let _ = straggler_tx.send(());
        let straggler_result = straggler.await.expect("straggler task panicked");
        assert!(matches!(
            straggler_result,
            Err(CircuitBreakerError::OperationFailed(TestError::Transient))
        ));
        assert_eq!(circuit.state(), CircuitState::Open);

        let _ = probe_tx.send(());
        let probe_result = probe.await.expect("probe task panicked");
        assert!(probe_result.is_ok());
        assert_eq!(circuit.state(), CircuitState::Closed);
        assert_eq!(circuit.status().failure_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_probe_releases_slot() {
        let circuit = breaker(1, 5);
        fail(&circuit).await;
        tokio::time::advance(Duration::from_secs(5)).await;

        {
            let probe = circuit.call(|| std::future::pending::<Result<(), TestError>>());
            let _ = tokio::time::timeout(Duration::from_millis(10), probe).await;
        }

        assert_eq!(circuit.state(), CircuitState::HalfOpen);
        let result = circuit.call(|| async { Ok::<_, TestError>(()) }).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_custom_predicate() {
        let circuit = breaker(1, 30);
        let result = circuit
            .call_with_predicate(|| async { Err::<(), _>("boom") }, |_| true)
            .await;
        assert!(result.is_err());
        assert_eq!(circuit.state(), CircuitState::Open);
    }

    #[test]
    fn test_state_display_and_serde() {
        assert_eq!(CircuitState::HalfOpen.to_string(), "half_open");
        assert_eq!(
            serde_json::to_string(&CircuitState::Open).unwrap(),
            "\"open\""
        );
    }
}
