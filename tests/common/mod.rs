//! Shared fixtures for the integration tests.

#![allow(dead_code)]

pub mod builders;
pub mod faults;

use private_markets::config::AppConfig;
use private_markets::repository::{InMemoryStore, Repositories};
use private_markets::services::Services;
use std::sync::Arc;

pub use builders::*;
pub use faults::*;

/// Configuration for tests: in-memory store, fast retries, no jitter
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::in_memory();
    config.retry.base_delay_ms = 10;
    config.retry.max_delay_ms = 100;
    config.retry.jitter = false;
    config.circuit_breaker.failure_threshold = 3;
    config.circuit_breaker.recovery_timeout_seconds = 30.0;
    config
}

/// Services over a fresh in-memory store, returning the store for direct seeding
pub fn in_memory_services(config: &AppConfig) -> (Arc<InMemoryStore>, Services) {
    let store = Arc::new(InMemoryStore::new());
    let services = Services::new(Repositories::from_store(store.clone()), config);
    (store, services)
}
