//! # Health Check Handler

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::cache::CacheStats;
use crate::resilience::CircuitBreakerStatus;
use crate::services::RecordCounts;
use crate::web::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: bool,
    pub records: Option<RecordCounts>,
    pub circuit_breaker: CircuitBreakerStatus,
    pub cache: CacheStats,
}

/// Liveness and readiness probe: GET /health
///
/// Always 200; `status` is `degraded` when the database does not answer.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.services.health.snapshot().await;
    Json(HealthResponse {
        status: snapshot.status(),
        version: env!("CARGO_PKG_VERSION"),
        database: snapshot.database,
        records: snapshot.records,
        circuit_breaker: snapshot.circuit_breaker,
        cache: snapshot.cache,
    })
}
