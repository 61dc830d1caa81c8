use super::money;
use crate::state_machine::FundStatus;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Fund represents a private-market fund raising and deploying capital
/// Maps to `funds` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Fund {
    pub id: Uuid,
    pub name: String,
    pub vintage_year: i32,
    pub target_size_usd: BigDecimal,
    pub status: FundStatus,
    pub created_at: DateTime<Utc>,
}

/// New Fund for creation (without generated fields)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFund {
    pub name: String,
    pub vintage_year: i32,
    #[serde(deserialize_with = "money::deserialize")]
    pub target_size_usd: BigDecimal,
    #[serde(default)]
    pub status: FundStatus,
}

/// Full replacement of a fund's mutable fields, identified by `id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundUpdate {
    pub id: Uuid,
    pub name: String,
    pub vintage_year: i32,
    #[serde(deserialize_with = "money::deserialize")]
    pub target_size_usd: BigDecimal,
    #[serde(default)]
    pub status: FundStatus,
}

impl Fund {
    /// Build a fund with a fresh id and creation timestamp
    pub fn new(new_fund: NewFund) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: new_fund.name,
            vintage_year: new_fund.vintage_year,
            target_size_usd: new_fund.target_size_usd,
            status: new_fund.status,
            created_at: Utc::now(),
        }
    }

    /// Replace every mutable field; `id` and `created_at` are kept
    pub fn apply_update(&mut self, update: FundUpdate) {
        self.name = update.name;
        self.vintage_year = update.vintage_year;
        self.target_size_usd = update.target_size_usd;
        self.status = update.status;
    }
}
