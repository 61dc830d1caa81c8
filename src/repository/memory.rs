//! In-memory persistence mirroring the PostgreSQL schema's constraints.

use super::{
    DatabaseProbe, FundRepository, InvestmentRepository, InvestorRepository,
    INVESTOR_EMAIL_CONSTRAINT,
};
use crate::error::{RepositoryError, RepositoryResult};
use crate::models::{Fund, Investment, Investor, Page};
use async_trait::async_trait;
use bigdecimal::{BigDecimal, Zero};
use parking_lot::RwLock;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Tables {
    funds: BTreeMap<Uuid, Fund>,
    investors: BTreeMap<Uuid, Investor>,
    investments: BTreeMap<Uuid, Investment>,
}

/// Process-local store used by tests and by the server when no database is configured
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

fn unique(constraint: &str) -> RepositoryError {
    RepositoryError::UniqueViolation {
        constraint: constraint.to_string(),
    }
}

fn foreign_key(constraint: &str) -> RepositoryError {
    RepositoryError::ForeignKeyViolation {
        constraint: constraint.to_string(),
    }
}

fn check(constraint: &str) -> RepositoryError {
    RepositoryError::CheckViolation {
        constraint: constraint.to_string(),
    }
}

fn paginate<T: Clone>(rows: impl Iterator<Item = T>, page: Page) -> Vec<T> {
    rows.skip(page.skip as usize)
        .take(page.limit as usize)
        .collect()
}

fn check_fund(fund: &Fund) -> RepositoryResult<()> {
    if fund.name.is_empty() {
        return Err(check("ck_funds_name_not_empty"));
    }
    if fund.vintage_year < 1900 {
        return Err(check("ck_funds_vintage_year_min"));
    }
    if fund.target_size_usd <= BigDecimal::zero() {
        return Err(check("ck_funds_target_size_positive"));
    }
    Ok(())
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delete a fund; refused while investments reference it
    pub fn remove_fund(&self, id: Uuid) -> RepositoryResult<bool> {
        let mut tables = self.tables.write();
        if tables.investments.values().any(|i| i.fund_id == id) {
            return Err(foreign_key("investments_fund_id_fkey"));
        }
        Ok(tables.funds.remove(&id).is_some())
    }

    /// Delete an investor; refused while investments reference it
    pub fn remove_investor(&self, id: Uuid) -> RepositoryResult<bool> {
        let mut tables = self.tables.write();
        if tables.investments.values().any(|i| i.investor_id == id) {
            return Err(foreign_key("investments_investor_id_fkey"));
        }
        Ok(tables.investors.remove(&id).is_some())
    }
}

#[async_trait]
impl FundRepository for InMemoryStore {
    async fn get(&self, id: Uuid) -> RepositoryResult<Option<Fund>> {
        Ok(self.tables.read().funds.get(&id).cloned())
    }

    async fn list(&self, page: Page) -> RepositoryResult<Vec<Fund>> {
        Ok(paginate(self.tables.read().funds.values().cloned(), page))
    }

    async fn create(&self, fund: &Fund) -> RepositoryResult<Fund> {
        check_fund(fund)?;
        let mut tables = self.tables.write();
        if tables.funds.contains_key(&fund.id) {
            return Err(unique("funds_pkey"));
        }
        tables.funds.insert(fund.id, fund.clone());
        Ok(fund.clone())
    }

    async fn update(&self, fund: &Fund) -> RepositoryResult<Option<Fund>> {
        check_fund(fund)?;
        let mut tables = self.tables.write();
        Ok(tables.funds.get_mut(&fund.id).map(|stored| {
            stored.name = fund.name.clone();
            stored.vintage_year = fund.vintage_year;
            stored.target_size_usd = fund.target_size_usd.clone();
            stored.status = fund.status;
            stored.clone()
        }))
    }

    async fn count(&self) -> RepositoryResult<i64> {
        Ok(self.tables.read().funds.len() as i64)
    }
}

#[async_trait]
impl InvestorRepository for InMemoryStore {
    async fn get(&self, id: Uuid) -> RepositoryResult<Option<Investor>> {
        Ok(self.tables.read().investors.get(&id).cloned())
    }

    async fn list(&self, page: Page) -> RepositoryResult<Vec<Investor>> {
        Ok(paginate(self.tables.read().investors.values().cloned(), page))
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Investor>> {
        Ok(self
            .tables
            .read()
            .investors
            .values()
            .find(|investor| investor.email == email)
            .cloned())
    }

    async fn create(&self, investor: &Investor) -> RepositoryResult<Investor> {
        if investor.name.is_empty() {
            return Err(check("ck_investors_name_not_empty"));
        }
        if investor.email.is_empty() {
            return Err(check("ck_investors_email_not_empty"));
        }

        let mut tables = self.tables.write();
        if tables.investors.contains_key(&investor.id) {
            return Err(unique("investors_pkey"));
        }
        if tables.investors.values().any(|i| i.email == investor.email) {
            return Err(unique(INVESTOR_EMAIL_CONSTRAINT));
        }
        tables.investors.insert(investor.id, investor.clone());
        Ok(investor.clone())
    }

    async fn count(&self) -> RepositoryResult<i64> {
        Ok(self.tables.read().investors.len() as i64)
    }
}

#[async_trait]
impl InvestmentRepository for InMemoryStore {
    async fn list_by_fund(&self, fund_id: Uuid, page: Page) -> RepositoryResult<Vec<Investment>> {
        let tables = self.tables.read();
        let mut rows: Vec<&Investment> = tables
            .investments
            .values()
            .filter(|investment| investment.fund_id == fund_id)
            .collect();
        rows.sort_by_key(|investment| (Reverse(investment.investment_date), investment.id));
        Ok(paginate(rows.into_iter().cloned(), page))
    }

    async fn create(&self, investment: &Investment) -> RepositoryResult<Investment> {
        if investment.amount_usd <= BigDecimal::zero() {
            return Err(check("ck_investments_amount_positive"));
        }

        let mut tables = self.tables.write();
        if !tables.funds.contains_key(&investment.fund_id) {
            return Err(foreign_key("investments_fund_id_fkey"));
        }
        if !tables.investors.contains_key(&investment.investor_id) {
            return Err(foreign_key("investments_investor_id_fkey"));
        }
        if tables.investments.contains_key(&investment.id) {
            return Err(unique("investments_pkey"));
        }
        tables.investments.insert(investment.id, investment.clone());
        Ok(investment.clone())
    }

    async fn count(&self) -> RepositoryResult<i64> {
        Ok(self.tables.read().investments.len() as i64)
    }
}

#[async_trait]
impl DatabaseProbe for InMemoryStore {
    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}
