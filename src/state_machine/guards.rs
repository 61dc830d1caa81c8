use super::states::FundStatus;
use crate::error::{ServiceError, ServiceResult};

/// Guard enforcing the one-way fund lifecycle
/// `Fundraising → Investing → Closed`. Self-transitions are no-ops.
#[derive(Debug, Clone, Copy, Default)]
pub struct FundTransitionGuard;

impl FundTransitionGuard {
    /// States reachable from `current`, including `current` itself
    pub fn allowed_targets(current: FundStatus) -> &'static [FundStatus] {
        match current {
            FundStatus::Fundraising => &[
                FundStatus::Fundraising,
                FundStatus::Investing,
                FundStatus::Closed,
            ],
            FundStatus::Investing => &[FundStatus::Investing, FundStatus::Closed],
            FundStatus::Closed => &[FundStatus::Closed],
        }
    }

    pub fn is_allowed(current: FundStatus, requested: FundStatus) -> bool {
        Self::allowed_targets(current).contains(&requested)
    }

    /// Check a requested transition, naming both states on rejection
    pub fn can_transition(current: FundStatus, requested: FundStatus) -> ServiceResult<()> {
        if Self::is_allowed(current, requested) {
            return Ok(());
        }

        Err(ServiceError::business_rule(format!(
            "Invalid status transition: '{current}' → '{requested}'. \
             Fund lifecycle is Fundraising → Investing → Closed (one-way)."
        )))
    }
}
