pub mod fund;
pub mod investment;
pub mod investor;
pub mod money;

use serde::{Deserialize, Serialize};

// Re-export core models for easy access
pub use crate::state_machine::FundStatus;
pub use fund::{Fund, FundUpdate, NewFund};
pub use investment::{Investment, NewInvestment};
pub use investor::{Investor, InvestorType, NewInvestor};

/// Offset pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Page {
    pub const DEFAULT_LIMIT: u32 = 100;
    pub const MAX_LIMIT: u32 = 1000;

    pub fn new(skip: u32, limit: u32) -> Self {
        Self { skip, limit }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.skip)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}
