//! # Persistence Collaborators
//!
//! Async traits the services depend on, one per entity, plus a liveness probe.
//! Two implementations ship with the crate:
//!
//! - [`PgStore`]: PostgreSQL through `sqlx`
//! - [`InMemoryStore`]: process-local maps enforcing the same unique,
//!   foreign-key and check constraints as the SQL schema
//!
//! Every implementation must return list results in a stable order so that
//! consecutive pages never overlap or skip rows.

pub mod memory;
pub mod postgres;

use crate::error::RepositoryResult;
use crate::models::{Fund, Investment, Investor, Page};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

/// Name of the unique index on `investors.email`
pub const INVESTOR_EMAIL_CONSTRAINT: &str = "investors_email_key";

#[async_trait]
pub trait FundRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> RepositoryResult<Option<Fund>>;

    /// Funds ordered by id
    async fn list(&self, page: Page) -> RepositoryResult<Vec<Fund>>;

    async fn create(&self, fund: &Fund) -> RepositoryResult<Fund>;

    /// Persist every mutable field; `None` when the fund no longer exists
    async fn update(&self, fund: &Fund) -> RepositoryResult<Option<Fund>>;

    async fn count(&self) -> RepositoryResult<i64>;
}

#[async_trait]
pub trait InvestorRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> RepositoryResult<Option<Investor>>;

    /// Investors ordered by id
    async fn list(&self, page: Page) -> RepositoryResult<Vec<Investor>>;

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Investor>>;

    async fn create(&self, investor: &Investor) -> RepositoryResult<Investor>;

    async fn count(&self) -> RepositoryResult<i64>;
}

#[async_trait]
pub trait InvestmentRepository: Send + Sync {
    /// Investments of one fund, newest `investment_date` first, ties by id
    async fn list_by_fund(&self, fund_id: Uuid, page: Page) -> RepositoryResult<Vec<Investment>>;

    async fn create(&self, investment: &Investment) -> RepositoryResult<Investment>;

    async fn count(&self) -> RepositoryResult<i64>;
}

#[async_trait]
pub trait DatabaseProbe: Send + Sync {
    /// Cheap round-trip proving the backing store is reachable
    async fn ping(&self) -> RepositoryResult<()>;
}

/// The set of collaborators the services are built from
#[derive(Clone)]
pub struct Repositories {
    pub funds: Arc<dyn FundRepository>,
    pub investors: Arc<dyn InvestorRepository>,
    pub investments: Arc<dyn InvestmentRepository>,
    pub probe: Arc<dyn DatabaseProbe>,
}

impl Repositories {
    /// All four roles served by one store
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: FundRepository + InvestorRepository + InvestmentRepository + DatabaseProbe + 'static,
    {
        Self {
            funds: store.clone(),
            investors: store.clone(),
            investments: store.clone(),
            probe: store,
        }
    }

    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(InMemoryStore::new()))
    }
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}
