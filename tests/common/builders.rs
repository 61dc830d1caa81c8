//! Payload builders with sensible defaults.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use private_markets::models::{
    Fund, FundStatus, FundUpdate, InvestorType, NewFund, NewInvestment, NewInvestor,
};
use uuid::Uuid;

pub fn new_fund(name: &str) -> NewFund {
    NewFund {
        name: name.to_string(),
        vintage_year: 2024,
        target_size_usd: BigDecimal::from(250_000_000),
        status: FundStatus::Fundraising,
    }
}

pub fn new_fund_with_status(name: &str, status: FundStatus) -> NewFund {
    NewFund {
        status,
        ..new_fund(name)
    }
}

/// Full-replace payload keeping every field of `fund` except the status
pub fn fund_update(fund: &Fund, status: FundStatus) -> FundUpdate {
    FundUpdate {
        id: fund.id,
        name: fund.name.clone(),
        vintage_year: fund.vintage_year,
        target_size_usd: fund.target_size_usd.clone(),
        status,
    }
}

pub fn new_investor(email: &str) -> NewInvestor {
    NewInvestor {
        name: "Goldman Sachs Asset Management".to_string(),
        investor_type: InvestorType::Institution,
        email: email.to_string(),
    }
}

pub fn new_investment(investor_id: Uuid, amount: i64, date: NaiveDate) -> NewInvestment {
    NewInvestment {
        investor_id,
        amount_usd: BigDecimal::from(amount),
        investment_date: date,
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}
