//! # Entity Services
//!
//! Request-scoped operations for funds, investors and investments. Each
//! service combines the shared cache, the database guard (circuit breaker
//! plus retry) and the business rules of its entity:
//!
//! - reads consult the cache first and populate it on a miss
//! - writes validate the payload, run through the guard and then drop the
//!   entity's cache namespace
//! - integrity violations reported by the store are translated into
//!   [`ServiceError::Conflict`] or [`ServiceError::BusinessRuleViolation`]
//!
//! The cache and breaker are built once per process and handed to every
//! service through [`ServiceContext`].

pub mod fund_service;
pub mod health;
pub mod investment_service;
pub mod investor_service;

use crate::cache::TtlCache;
use crate::config::AppConfig;
use crate::error::{RepositoryError, ServiceError, ServiceResult};
use crate::models::{Fund, Investment, Investor};
use crate::repository::Repositories;
use crate::resilience::{CircuitBreakerError, DatabaseGuard};
use std::sync::Arc;
use tracing::warn;

pub use fund_service::FundService;
pub use health::{HealthService, HealthSnapshot, RecordCounts};
pub use investment_service::InvestmentService;
pub use investor_service::InvestorService;

pub const FUNDS_PREFIX: &str = "funds:";
pub const INVESTORS_PREFIX: &str = "investors:";
pub const INVESTMENTS_PREFIX: &str = "investments:";

/// Payloads held by the shared cache
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Fund(Fund),
    Funds(Vec<Fund>),
    Investors(Vec<Investor>),
    Investments(Vec<Investment>),
}

/// Process-wide collaborators shared by every service
#[derive(Debug, Clone)]
pub struct ServiceContext {
    pub cache: Arc<TtlCache<CachedValue>>,
    pub guard: DatabaseGuard,
}

impl ServiceContext {
    pub fn new(cache: Arc<TtlCache<CachedValue>>, guard: DatabaseGuard) -> Self {
        Self { cache, guard }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Arc::new(TtlCache::from_config(&config.cache)),
            DatabaseGuard::from_config(config),
        )
    }
}

/// Every service, wired to one shared context
#[derive(Debug, Clone)]
pub struct Services {
    pub context: ServiceContext,
    pub funds: FundService,
    pub investors: InvestorService,
    pub investments: InvestmentService,
    pub health: HealthService,
}

impl Services {
    pub fn new(repositories: Repositories, config: &AppConfig) -> Self {
        Self::with_context(repositories, ServiceContext::from_config(config))
    }

    pub fn with_context(repositories: Repositories, context: ServiceContext) -> Self {
        Self {
            funds: FundService::new(repositories.funds.clone(), context.clone()),
            investors: InvestorService::new(repositories.investors.clone(), context.clone()),
            investments: InvestmentService::new(
                repositories.funds.clone(),
                repositories.investors.clone(),
                repositories.investments.clone(),
                context.clone(),
            ),
            health: HealthService::new(repositories, context.clone()),
            context,
        }
    }
}

/// Convert a guarded write result, mapping integrity violations through
/// `on_violation` and every other failure through the standard conversion
pub(crate) fn translate_write<T>(
    operation: &str,
    result: Result<T, CircuitBreakerError<RepositoryError>>,
    on_violation: impl FnOnce(&RepositoryError) -> ServiceError,
) -> ServiceResult<T> {
    match result {
        Ok(value) => Ok(value),
        Err(CircuitBreakerError::OperationFailed(err)) if err.is_integrity_violation() => {
            warn!(
                operation = operation,
                error = %err,
                "Integrity violation translated to domain error"
            );
            Err(on_violation(&err))
        }
        Err(other) => Err(other.into()),
    }
}
