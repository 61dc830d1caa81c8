// Fund lifecycle state machine
//
// Funds move one way through Fundraising → Investing → Closed. The guard is a
// pure function of (current, requested); persistence of the new state is the
// fund service's job.

pub mod guards;
pub mod states;

pub use guards::FundTransitionGuard;
pub use states::FundStatus;
