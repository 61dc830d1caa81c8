use super::{translate_write, CachedValue, ServiceContext, INVESTORS_PREFIX};
use crate::error::{RepositoryError, ServiceError, ServiceResult};
use crate::models::{Investor, NewInvestor, Page};
use crate::repository::{InvestorRepository, INVESTOR_EMAIL_CONSTRAINT};
use crate::validation;
use std::sync::Arc;
use tracing::{debug, info};

/// Investor listing and registration with duplicate-email detection
#[derive(Clone)]
pub struct InvestorService {
    investors: Arc<dyn InvestorRepository>,
    context: ServiceContext,
}

impl std::fmt::Debug for InvestorService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvestorService").finish_non_exhaustive()
    }
}

fn duplicate_email(email: &str) -> ServiceError {
    ServiceError::conflict(format!("An investor with email '{email}' already exists"))
}

impl InvestorService {
    pub fn new(investors: Arc<dyn InvestorRepository>, context: ServiceContext) -> Self {
        Self { investors, context }
    }

    pub async fn list(&self, page: Page) -> ServiceResult<Vec<Investor>> {
        let key = format!("{INVESTORS_PREFIX}list:{}:{}", page.skip, page.limit);
        if let Some(CachedValue::Investors(investors)) = self.context.cache.get(&key) {
            return Ok(investors);
        }

        let investors = self
            .context
            .guard
            .read("list_investors", || self.investors.list(page))
            .await?;

        self.context
            .cache
            .set(&key, CachedValue::Investors(investors.clone()));
        Ok(investors)
    }

    /// Register an investor.
    ///
    /// The email lookup is a fast path only; a concurrent registration can
    /// still win the race, in which case the store's unique index rejects the
    /// insert and the result is the same `Conflict`.
    pub async fn create(&self, new_investor: NewInvestor) -> ServiceResult<Investor> {
        let new_investor = validation::validate_new_investor(new_investor)?;
        let email = new_investor.email.clone();

        let existing = self
            .context
            .guard
            .read("find_investor_by_email", || {
                self.investors.find_by_email(&email)
            })
            .await?;
        if existing.is_some() {
            debug!(email = %email, "Duplicate email rejected by pre-check");
            return Err(duplicate_email(&email));
        }

        let investor = Investor::new(new_investor);
        let result = self
            .context
            .guard
            .write("create_investor", || self.investors.create(&investor))
            .await;
        let created = translate_write("create_investor", result, |err| match err {
            RepositoryError::UniqueViolation { constraint }
                if constraint == INVESTOR_EMAIL_CONSTRAINT =>
            {
                duplicate_email(&email)
            }
            // Primary key collisions, e.g. a retried insert that already committed
            RepositoryError::UniqueViolation { .. } => ServiceError::Repository(err.clone()),
            _ => ServiceError::business_rule(
                "Investor data violates a database constraint. Check all fields.",
            ),
        })?;

        let invalidated = self.context.cache.invalidate(&[INVESTORS_PREFIX]);
        info!(
            investor_id = %created.id,
            investor_type = %created.investor_type,
            invalidated = invalidated,
            "✅ Investor created"
        );
        Ok(created)
    }
}
