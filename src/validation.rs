//! Field-level payload validation.
//!
//! Runs in the services before any persistence call. Each validator consumes
//! the payload and returns it normalised (names trimmed, emails lowercased)
//! or a [`ServiceError::Validation`] naming the offending field.

use crate::error::{ServiceError, ServiceResult};
use crate::models::{FundUpdate, NewFund, NewInvestment, NewInvestor};
use bigdecimal::{BigDecimal, Zero};
use chrono::{Datelike, Days, NaiveDate, Utc};

pub const MAX_NAME_LENGTH: usize = 255;
pub const MAX_EMAIL_LENGTH: usize = 320;
pub const MIN_VINTAGE_YEAR: i32 = 1900;
/// How many years past the current one a vintage may be declared
pub const VINTAGE_YEAR_LOOKAHEAD: i32 = 5;
/// Investments may be forward-dated by at most this many days
pub const MAX_FORWARD_DATED_DAYS: u64 = 365;
/// Money columns are `NUMERIC(20, 2)`
pub const MONEY_SCALE: i64 = 2;
pub const MONEY_INTEGER_DIGITS: u64 = 18;

pub fn validate_new_fund(mut fund: NewFund) -> ServiceResult<NewFund> {
    fund.name = validate_name(&fund.name)?;
    validate_vintage_year(fund.vintage_year, Utc::now().year())?;
    validate_money_amount("target_size_usd", &fund.target_size_usd)?;
    Ok(fund)
}

pub fn validate_fund_update(mut update: FundUpdate) -> ServiceResult<FundUpdate> {
    update.name = validate_name(&update.name)?;
    validate_vintage_year(update.vintage_year, Utc::now().year())?;
    validate_money_amount("target_size_usd", &update.target_size_usd)?;
    Ok(update)
}

pub fn validate_new_investor(mut investor: NewInvestor) -> ServiceResult<NewInvestor> {
    investor.name = validate_name(&investor.name)?;
    investor.email = normalize_email(&investor.email)?;
    Ok(investor)
}

pub fn validate_new_investment(investment: NewInvestment) -> ServiceResult<NewInvestment> {
    validate_money_amount("amount_usd", &investment.amount_usd)?;
    validate_investment_date(investment.investment_date, Utc::now().date_naive())?;
    Ok(investment)
}

/// Trimmed, non-blank, at most [`MAX_NAME_LENGTH`] characters
pub fn validate_name(name: &str) -> ServiceResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::validation("name must not be blank"));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(ServiceError::validation(format!(
            "name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

pub fn validate_vintage_year(year: i32, current_year: i32) -> ServiceResult<()> {
    let max_year = current_year + VINTAGE_YEAR_LOOKAHEAD;
    if !(MIN_VINTAGE_YEAR..=max_year).contains(&year) {
        return Err(ServiceError::validation(format!(
            "vintage_year must be between {MIN_VINTAGE_YEAR} and {max_year}"
        )));
    }
    Ok(())
}

/// Strictly positive, at most two decimal places and small enough for a
/// `NUMERIC(20, 2)` column. Trailing zeros beyond the scale are accepted.
pub fn validate_money_amount(field: &str, amount: &BigDecimal) -> ServiceResult<()> {
    if amount <= &BigDecimal::zero() {
        return Err(ServiceError::validation(format!(
            "{field} must be greater than 0"
        )));
    }

    let (_, scale) = amount.normalized().as_bigint_and_exponent();
    if scale > MONEY_SCALE {
        return Err(ServiceError::validation(format!(
            "{field} must have at most {MONEY_SCALE} decimal places"
        )));
    }

    if amount.with_scale(0).digits() > MONEY_INTEGER_DIGITS {
        return Err(ServiceError::validation(format!(
            "{field} must have at most {MONEY_INTEGER_DIGITS} digits before the decimal point"
        )));
    }
    Ok(())
}

pub fn validate_investment_date(date: NaiveDate, today: NaiveDate) -> ServiceResult<()> {
    let max_date = today
        .checked_add_days(Days::new(MAX_FORWARD_DATED_DAYS))
        .unwrap_or(NaiveDate::MAX);
    if date > max_date {
        return Err(ServiceError::validation(format!(
            "investment_date cannot be more than one year in the future (max: {max_date})"
        )));
    }
    Ok(())
}

/// Lowercased, trimmed address with one `@`, a non-empty local part and a
/// dotted domain
pub fn normalize_email(email: &str) -> ServiceResult<String> {
    let email = email.trim().to_lowercase();
    let invalid = || ServiceError::validation(format!("'{email}' is not a valid email address"));

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ServiceError::validation(format!(
            "email must be at most {MAX_EMAIL_LENGTH} characters"
        )));
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }

    Ok(email)
}
