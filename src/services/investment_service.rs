use super::{translate_write, CachedValue, ServiceContext, INVESTMENTS_PREFIX};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{Fund, Investment, NewInvestment, Page};
use crate::repository::{FundRepository, InvestmentRepository, InvestorRepository};
use crate::validation;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Investments scoped to a fund.
///
/// Creation checks, in order, that the fund exists, that it still accepts
/// capital and that the investor exists. The checks read the store directly,
/// never the cache, so a fund closed moments ago is seen as closed.
#[derive(Clone)]
pub struct InvestmentService {
    funds: Arc<dyn FundRepository>,
    investors: Arc<dyn InvestorRepository>,
    investments: Arc<dyn InvestmentRepository>,
    context: ServiceContext,
}

impl std::fmt::Debug for InvestmentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvestmentService").finish_non_exhaustive()
    }
}

impl InvestmentService {
    pub fn new(
        funds: Arc<dyn FundRepository>,
        investors: Arc<dyn InvestorRepository>,
        investments: Arc<dyn InvestmentRepository>,
        context: ServiceContext,
    ) -> Self {
        Self {
            funds,
            investors,
            investments,
            context,
        }
    }

    async fn require_fund(&self, fund_id: Uuid) -> ServiceResult<Fund> {
        self.context
            .guard
            .read("get_fund", || self.funds.get(fund_id))
            .await?
            .ok_or_else(|| ServiceError::not_found("Fund", fund_id))
    }

    /// Investments of one fund, newest first. A missing fund is `NotFound`,
    /// never an empty page.
    pub async fn list_by_fund(&self, fund_id: Uuid, page: Page) -> ServiceResult<Vec<Investment>> {
        self.require_fund(fund_id).await?;

        let key = format!("{INVESTMENTS_PREFIX}{fund_id}:{}:{}", page.skip, page.limit);
        if let Some(CachedValue::Investments(investments)) = self.context.cache.get(&key) {
            return Ok(investments);
        }

        let investments = self
            .context
            .guard
            .read("list_investments_by_fund", || {
                self.investments.list_by_fund(fund_id, page)
            })
            .await?;

        self.context
            .cache
            .set(&key, CachedValue::Investments(investments.clone()));
        Ok(investments)
    }

    pub async fn create(
        &self,
        fund_id: Uuid,
        new_investment: NewInvestment,
    ) -> ServiceResult<Investment> {
        let new_investment = validation::validate_new_investment(new_investment)?;

        let fund = self.require_fund(fund_id).await?;
        if !fund.status.accepts_investments() {
            warn!(fund_id = %fund_id, status = %fund.status, "Investment into closed fund rejected");
            return Err(ServiceError::business_rule(format!(
                "Fund '{}' is closed and no longer accepts investments",
                fund.name
            )));
        }

        let investor_id = new_investment.investor_id;
        self.context
            .guard
            .read("get_investor", || self.investors.get(investor_id))
            .await?
            .ok_or_else(|| ServiceError::not_found("Investor", investor_id))?;

        let investment = Investment::new(fund_id, new_investment);
        let result = self
            .context
            .guard
            .write("create_investment", || self.investments.create(&investment))
            .await;
        // Fund or investor removed between the checks above and the insert
        let created = translate_write("create_investment", result, |_| {
            ServiceError::business_rule(
                "Investment could not be created; a referenced fund or investor may have been \
                 removed, or a database constraint was violated.",
            )
        })?;

        let invalidated = self.context.cache.invalidate(&[INVESTMENTS_PREFIX]);
        info!(
            investment_id = %created.id,
            fund_id = %fund_id,
            investor_id = %investor_id,
            amount_usd = %created.amount_usd,
            invalidated = invalidated,
            "✅ Investment created"
        );
        Ok(created)
    }
}
