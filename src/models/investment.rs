use super::money;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Investment is a single capital commitment from an investor into a fund
/// Maps to `investments` table; both foreign keys are `ON DELETE RESTRICT`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Investment {
    pub id: Uuid,
    pub fund_id: Uuid,
    pub investor_id: Uuid,
    pub amount_usd: BigDecimal,
    pub investment_date: NaiveDate,
}

/// New Investment for creation; the fund comes from the request path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvestment {
    pub investor_id: Uuid,
    #[serde(deserialize_with = "money::deserialize")]
    pub amount_usd: BigDecimal,
    pub investment_date: NaiveDate,
}

impl Investment {
    pub fn new(fund_id: Uuid, new_investment: NewInvestment) -> Self {
        Self {
            id: Uuid::new_v4(),
            fund_id,
            investor_id: new_investment.investor_id,
            amount_usd: new_investment.amount_usd,
            investment_date: new_investment.investment_date,
        }
    }
}
