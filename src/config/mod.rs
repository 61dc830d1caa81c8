//! # Configuration System
//!
//! Layered configuration built on the `config` crate. Later layers override
//! earlier ones:
//!
//! 1. Built-in defaults (the `Default` impls below)
//! 2. `config/default.toml` (optional)
//! 3. `config/<environment>.toml` (optional)
//! 4. `PM_`-prefixed environment variables, `__` separating sections
//!    (e.g. `PM_CACHE__TTL_SECONDS=10`)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use private_markets::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let ttl = manager.config().cache.ttl();
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub circuit_breaker: CircuitBreakerSettings,
    pub retry: RetrySettings,
    pub web: WebConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string; required unless `use_in_memory` is set
    pub url: Option<String>,
    pub use_in_memory: bool,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            use_in_memory: false,
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_seconds: 30,
            idle_timeout_seconds: 1800,
            run_migrations: true,
        }
    }
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_seconds)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_seconds)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl_seconds: f64,
    pub max_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: 30.0,
            max_size: 1000,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        seconds_to_duration(self.ttl_seconds)
    }
}

/// Seconds as a `Duration`, clamped into range: negative or NaN becomes zero,
/// anything too large for `Duration` saturates. `AppConfig::validate`
/// rejects both before they reach this point.
pub(crate) fn seconds_to_duration(seconds: f64) -> Duration {
    if seconds.is_nan() || seconds <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
}

/// Strictly positive, finite and representable as a `Duration`
fn validate_seconds(field: &str, seconds: f64) -> ConfigResult<()> {
    let representable = seconds > 0.0 && Duration::try_from_secs_f64(seconds).is_ok();
    if !representable {
        return Err(ConfigurationError::invalid_value(
            field,
            seconds.to_string(),
            "must be a finite number of seconds greater than 0",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitBreakerSettings {
    pub failure_threshold: u32,
    pub recovery_timeout_seconds: f64,
}

impl Default for CircuitBreakerSettings {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            recovery_timeout_seconds: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub jitter: bool,
    /// Also retry mutating calls; off because a write may have landed before the failure
    pub retry_writes: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 500,
            max_delay_ms: 10_000,
            jitter: true,
            retry_writes: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub bind_address: String,
    pub api_prefix: String,
    pub cors_origins: Vec<String>,
    pub slow_request_threshold_ms: u64,
    /// Responses at least this many bytes are gzip-compressed when the client accepts it
    pub compression_min_size: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            api_prefix: "/api/v1".to_string(),
            cors_origins: vec!["*".to_string()],
            slow_request_threshold_ms: 500,
            compression_min_size: 500,
        }
    }
}

impl WebConfig {
    pub fn slow_request_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_request_threshold_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Forces `debug` level regardless of `level`
    pub debug: bool,
    /// Directory for daily-rolling JSON log files; console only when unset
    pub directory: Option<String>,
    pub json_console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            debug: false,
            directory: None,
            json_console: false,
        }
    }
}

impl LoggingConfig {
    pub fn effective_level(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            &self.level
        }
    }
}

impl AppConfig {
    /// Configuration backed by the in-memory store, used by tests and demos
    pub fn in_memory() -> Self {
        Self {
            database: DatabaseConfig {
                use_in_memory: true,
                ..DatabaseConfig::default()
            },
            ..Self::default()
        }
    }

    /// Reject settings the services cannot run with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.circuit_breaker.failure_threshold == 0 {
            return Err(ConfigurationError::invalid_value(
                "circuit_breaker.failure_threshold",
                "0",
                "must be greater than 0",
            ));
        }

        validate_seconds(
            "circuit_breaker.recovery_timeout_seconds",
            self.circuit_breaker.recovery_timeout_seconds,
        )?;

        if self.cache.enabled && self.cache.max_size == 0 {
            return Err(ConfigurationError::invalid_value(
                "cache.max_size",
                "0",
                "must be greater than 0 while the cache is enabled",
            ));
        }

        validate_seconds("cache.ttl_seconds", self.cache.ttl_seconds)?;

        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            return Err(ConfigurationError::invalid_value(
                "retry.base_delay_ms",
                self.retry.base_delay_ms.to_string(),
                format!("must not exceed retry.max_delay_ms ({})", self.retry.max_delay_ms),
            ));
        }

        if !self.database.use_in_memory
            && self.database.url.as_deref().map_or(true, |url| url.trim().is_empty())
        {
            return Err(ConfigurationError::missing_required_field(
                "database.url",
                "database (set PM_DATABASE__URL or enable database.use_in_memory)",
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigurationError::invalid_value(
                "database.min_connections",
                self.database.min_connections.to_string(),
                "must not exceed database.max_connections",
            ));
        }

        Ok(())
    }

    /// Copy safe to log: the database URL is reduced to its host part
    pub fn sanitized(&self) -> Self {
        let mut clean = self.clone();
        clean.database.url = self.database.url.as_deref().map(redact_url);
        clean
    }
}

fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}
