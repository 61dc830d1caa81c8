//! Repository doubles that inject failures and races around [`InMemoryStore`].

use async_trait::async_trait;
use private_markets::error::{RepositoryError, RepositoryResult};
use private_markets::models::{Fund, Investor, Page};
use private_markets::repository::{FundRepository, InMemoryStore, InvestorRepository};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Investor store whose email lookup never finds a match, as if a concurrent
/// registration committed between the pre-check and the insert
pub struct BlindEmailLookup {
    inner: Arc<InMemoryStore>,
}

impl BlindEmailLookup {
    pub fn new(inner: Arc<InMemoryStore>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl InvestorRepository for BlindEmailLookup {
    async fn get(&self, id: Uuid) -> RepositoryResult<Option<Investor>> {
        InvestorRepository::get(self.inner.as_ref(), id).await
    }

    async fn list(&self, page: Page) -> RepositoryResult<Vec<Investor>> {
        InvestorRepository::list(self.inner.as_ref(), page).await
    }

    async fn find_by_email(&self, _email: &str) -> RepositoryResult<Option<Investor>> {
        Ok(None)
    }

    async fn create(&self, investor: &Investor) -> RepositoryResult<Investor> {
        InvestorRepository::create(self.inner.as_ref(), investor).await
    }

    async fn count(&self) -> RepositoryResult<i64> {
        InvestorRepository::count(self.inner.as_ref()).await
    }
}

/// Fund store whose reads fail with a transient error a configurable number
/// of times before succeeding
pub struct FlakyFunds {
    inner: Arc<InMemoryStore>,
    failures_remaining: AtomicU32,
    read_calls: AtomicU32,
}

impl FlakyFunds {
    pub fn new(inner: Arc<InMemoryStore>) -> Self {
        Self {
            inner,
            failures_remaining: AtomicU32::new(0),
            read_calls: AtomicU32::new(0),
        }
    }

    /// Fail the next `n` reads; `u32::MAX` fails until [`heal`](Self::heal)
    pub fn fail_next(&self, n: u32) {
        self.failures_remaining.store(n, Ordering::SeqCst);
    }

    pub fn heal(&self) {
        self.failures_remaining.store(0, Ordering::SeqCst);
    }

    /// Reads that actually reached the store
    pub fn read_calls(&self) -> u32 {
        self.read_calls.load(Ordering::SeqCst)
    }

    fn record_read(&self) -> RepositoryResult<()> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        let failed = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| match left {
                0 => None,
                u32::MAX => Some(u32::MAX),
                n => Some(n - 1),
            })
            .is_ok();

        if failed {
            Err(RepositoryError::transient("connection reset by peer"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl FundRepository for FlakyFunds {
    async fn get(&self, id: Uuid) -> RepositoryResult<Option<Fund>> {
        self.record_read()?;
        FundRepository::get(self.inner.as_ref(), id).await
    }

    async fn list(&self, page: Page) -> RepositoryResult<Vec<Fund>> {
        self.record_read()?;
        FundRepository::list(self.inner.as_ref(), page).await
    }

    async fn create(&self, fund: &Fund) -> RepositoryResult<Fund> {
        FundRepository::create(self.inner.as_ref(), fund).await
    }

    async fn update(&self, fund: &Fund) -> RepositoryResult<Option<Fund>> {
        FundRepository::update(self.inner.as_ref(), fund).await
    }

    async fn count(&self) -> RepositoryResult<i64> {
        FundRepository::count(self.inner.as_ref()).await
    }
}

/// Fund store that still reports `phantom` after it was removed from the
/// backing store, reproducing a delete racing an investment
pub struct PhantomFund {
    inner: Arc<InMemoryStore>,
    phantom: Fund,
}

impl PhantomFund {
    pub fn new(inner: Arc<InMemoryStore>, phantom: Fund) -> Self {
        Self { inner, phantom }
    }
}

#[async_trait]
impl FundRepository for PhantomFund {
    async fn get(&self, id: Uuid) -> RepositoryResult<Option<Fund>> {
        if id == self.phantom.id {
            return Ok(Some(self.phantom.clone()));
        }
        FundRepository::get(self.inner.as_ref(), id).await
    }

    async fn list(&self, page: Page) -> RepositoryResult<Vec<Fund>> {
        FundRepository::list(self.inner.as_ref(), page).await
    }

    async fn create(&self, fund: &Fund) -> RepositoryResult<Fund> {
        FundRepository::create(self.inner.as_ref(), fund).await
    }

    async fn update(&self, fund: &Fund) -> RepositoryResult<Option<Fund>> {
        FundRepository::update(self.inner.as_ref(), fund).await
    }

    async fn count(&self) -> RepositoryResult<i64> {
        FundRepository::count(self.inner.as_ref()).await
    }
}
