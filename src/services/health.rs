use super::ServiceContext;
use crate::cache::CacheStats;
use crate::error::RepositoryResult;
use crate::repository::Repositories;
use crate::resilience::CircuitBreakerStatus;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Operational view of the shared resilience and caching state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    /// Whether the database answered a ping
    pub database: bool,
    /// Row counts per table; `None` when the database is unreachable
    pub records: Option<RecordCounts>,
    pub circuit_breaker: CircuitBreakerStatus,
    pub cache: CacheStats,
}

/// Number of stored rows per entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCounts {
    pub funds: i64,
    pub investors: i64,
    pub investments: i64,
}

impl HealthSnapshot {
    pub fn status(&self) -> &'static str {
        if self.database {
            "ok"
        } else {
            "degraded"
        }
    }
}

#[derive(Clone)]
pub struct HealthService {
    repositories: Repositories,
    context: ServiceContext,
}

impl std::fmt::Debug for HealthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthService").finish_non_exhaustive()
    }
}

impl HealthService {
    pub fn new(repositories: Repositories, context: ServiceContext) -> Self {
        Self {
            repositories,
            context,
        }
    }

    /// Breaker status and cache statistics without touching the database
    pub fn resilience_snapshot(&self) -> (CircuitBreakerStatus, CacheStats) {
        (
            self.context.guard.breaker().status(),
            self.context.cache.stats(),
        )
    }

    /// Ping the database and count its rows directly, bypassing the
    /// breaker, then collect the breaker and cache state
    pub async fn snapshot(&self) -> HealthSnapshot {
        let database = match self.repositories.probe.ping().await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "Database health check failed");
                false
            }
        };

        let records = if database {
            match self.record_counts().await {
                Ok(counts) => Some(counts),
                Err(err) => {
                    warn!(error = %err, "Record counts unavailable");
                    None
                }
            }
        } else {
            None
        };

        let (circuit_breaker, cache) = self.resilience_snapshot();
        HealthSnapshot {
            database,
            records,
            circuit_breaker,
            cache,
        }
    }

    async fn record_counts(&self) -> RepositoryResult<RecordCounts> {
        Ok(RecordCounts {
            funds: self.repositories.funds.count().await?,
            investors: self.repositories.investors.count().await?,
            investments: self.repositories.investments.count().await?,
        })
    }
}
