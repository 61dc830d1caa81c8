use super::{translate_write, CachedValue, ServiceContext, FUNDS_PREFIX};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{Fund, FundUpdate, NewFund, Page};
use crate::repository::FundRepository;
use crate::state_machine::FundTransitionGuard;
use crate::validation;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Fund reads, creation and full-replace updates
#[derive(Clone)]
pub struct FundService {
    funds: Arc<dyn FundRepository>,
    context: ServiceContext,
}

impl std::fmt::Debug for FundService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FundService").finish_non_exhaustive()
    }
}

impl FundService {
    pub fn new(funds: Arc<dyn FundRepository>, context: ServiceContext) -> Self {
        Self { funds, context }
    }

    fn list_key(page: Page) -> String {
        format!("{FUNDS_PREFIX}list:{}:{}", page.skip, page.limit)
    }

    fn fund_key(id: Uuid) -> String {
        format!("{FUNDS_PREFIX}{id}")
    }

    /// One page of funds ordered by id
    pub async fn list(&self, page: Page) -> ServiceResult<Vec<Fund>> {
        let key = Self::list_key(page);
        if let Some(CachedValue::Funds(funds)) = self.context.cache.get(&key) {
            return Ok(funds);
        }

        let funds = self
            .context
            .guard
            .read("list_funds", || self.funds.list(page))
            .await?;

        self.context.cache.set(&key, CachedValue::Funds(funds.clone()));
        Ok(funds)
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<Fund> {
        let key = Self::fund_key(id);
        if let Some(CachedValue::Fund(fund)) = self.context.cache.get(&key) {
            return Ok(fund);
        }

        let fund = self
            .context
            .guard
            .read("get_fund", || self.funds.get(id))
            .await?
            .ok_or_else(|| ServiceError::not_found("Fund", id))?;

        self.context.cache.set(&key, CachedValue::Fund(fund.clone()));
        Ok(fund)
    }

    pub async fn create(&self, new_fund: NewFund) -> ServiceResult<Fund> {
        let fund = Fund::new(validation::validate_new_fund(new_fund)?);

        let result = self
            .context
            .guard
            .write("create_fund", || self.funds.create(&fund))
            .await;
        let created = translate_write("create_fund", result, |_| {
            ServiceError::business_rule("Fund data violates a database constraint. Check all fields.")
        })?;

        let invalidated = self.context.cache.invalidate(&[FUNDS_PREFIX]);
        info!(
            fund_id = %created.id,
            name = %created.name,
            status = %created.status,
            invalidated = invalidated,
            "✅ Fund created"
        );
        Ok(created)
    }

    /// Replace every mutable field of an existing fund.
    ///
    /// The current status is read from the store rather than the cache so the
    /// lifecycle check always sees the persisted state.
    pub async fn update(&self, update: FundUpdate) -> ServiceResult<Fund> {
        let update = validation::validate_fund_update(update)?;
        let id = update.id;

        let mut fund = self
            .context
            .guard
            .read("get_fund", || self.funds.get(id))
            .await?
            .ok_or_else(|| ServiceError::not_found("Fund", id))?;

        FundTransitionGuard::can_transition(fund.status, update.status)?;
        let previous_status = fund.status;
        fund.apply_update(update);

        let result = self
            .context
            .guard
            .write("update_fund", || self.funds.update(&fund))
            .await;
        let updated = translate_write("update_fund", result, |_| {
            ServiceError::business_rule("Fund update violates a database constraint. Check all fields.")
        })?
        .ok_or_else(|| ServiceError::not_found("Fund", id))?;

        let invalidated = self.context.cache.invalidate(&[FUNDS_PREFIX]);
        if previous_status != updated.status {
            debug!(fund_id = %id, from = %previous_status, to = %updated.status, "Fund status changed");
        }
        info!(fund_id = %id, invalidated = invalidated, "✅ Fund updated");
        Ok(updated)
    }
}
