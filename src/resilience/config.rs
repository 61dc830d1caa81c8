//! # Circuit Breaker Configuration
//!
//! Runtime form of the `[circuit_breaker]` configuration section. The file /
//! environment representation lives in [`crate::config::CircuitBreakerSettings`].

use crate::config::{seconds_to_duration, CircuitBreakerSettings};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a single circuit breaker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    /// Number of consecutive transient failures before opening the circuit
    pub failure_threshold: u32,

    /// Time to wait after the last failure before letting a probe through
    pub recovery_timeout: Duration,
}

impl CircuitBreakerConfig {
    /// Configuration for the database path
    pub fn for_database() -> Self {
        Self {
            failure_threshold: 5,
            recovery_timeout: Duration::from_secs(30),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.failure_threshold == 0 {
            return Err("failure_threshold must be greater than 0".to_string());
        }

        if self.failure_threshold > 100 {
            return Err("failure_threshold should not exceed 100".to_string());
        }

        if self.recovery_timeout.is_zero() {
            return Err("recovery_timeout must be greater than 0".to_string());
        }

        if self.recovery_timeout > Duration::from_secs(300) {
            return Err("recovery_timeout should not exceed 300 seconds".to_string());
        }

        Ok(())
    }
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self::for_database()
    }
}

impl From<&CircuitBreakerSettings> for CircuitBreakerConfig {
    fn from(settings: &CircuitBreakerSettings) -> Self {
        Self {
            failure_threshold: settings.failure_threshold,
            recovery_timeout: seconds_to_duration(settings.recovery_timeout_seconds),
        }
    }
}
