//! PostgreSQL persistence through `sqlx`.
//!
//! Queries are checked at runtime so the crate builds without a live
//! `DATABASE_URL`. Driver errors are classified by SQLSTATE in
//! `From<sqlx::Error> for RepositoryError`.

use super::{DatabaseProbe, FundRepository, InvestmentRepository, InvestorRepository};
use crate::error::RepositoryResult;
use crate::models::{Fund, Investment, Investor, Page};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

const FUND_COLUMNS: &str = "id, name, vintage_year, target_size_usd, status, created_at";
const INVESTOR_COLUMNS: &str = "id, name, investor_type, email, created_at";
const INVESTMENT_COLUMNS: &str = "id, fund_id, investor_id, amount_usd, investment_date";

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl FundRepository for PgStore {
    async fn get(&self, id: Uuid) -> RepositoryResult<Option<Fund>> {
        let fund = sqlx::query_as::<_, Fund>(&format!(
            "SELECT {FUND_COLUMNS} FROM funds WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(fund)
    }

    async fn list(&self, page: Page) -> RepositoryResult<Vec<Fund>> {
        let funds = sqlx::query_as::<_, Fund>(&format!(
            "SELECT {FUND_COLUMNS} FROM funds ORDER BY id OFFSET $1 LIMIT $2"
        ))
        .bind(page.offset())
        .bind(page.limit())
        .fetch_all(&self.pool)
        .await?;

        Ok(funds)
    }

    async fn create(&self, fund: &Fund) -> RepositoryResult<Fund> {
        let created = sqlx::query_as::<_, Fund>(&format!(
            r#"
            INSERT INTO funds (id, name, vintage_year, target_size_usd, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {FUND_COLUMNS}
            "#
        ))
        .bind(fund.id)
        .bind(&fund.name)
        .bind(fund.vintage_year)
        .bind(&fund.target_size_usd)
        .bind(fund.status)
        .bind(fund.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update(&self, fund: &Fund) -> RepositoryResult<Option<Fund>> {
        let updated = sqlx::query_as::<_, Fund>(&format!(
            r#"
            UPDATE funds
            SET name = $2, vintage_year = $3, target_size_usd = $4, status = $5
            WHERE id = $1
            RETURNING {FUND_COLUMNS}
            "#
        ))
        .bind(fund.id)
        .bind(&fund.name)
        .bind(fund.vintage_year)
        .bind(&fund.target_size_usd)
        .bind(fund.status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn count(&self) -> RepositoryResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM funds")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl InvestorRepository for PgStore {
    async fn get(&self, id: Uuid) -> RepositoryResult<Option<Investor>> {
        let investor = sqlx::query_as::<_, Investor>(&format!(
            "SELECT {INVESTOR_COLUMNS} FROM investors WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(investor)
    }

    async fn list(&self, page: Page) -> RepositoryResult<Vec<Investor>> {
        let investors = sqlx::query_as::<_, Investor>(&format!(
            "SELECT {INVESTOR_COLUMNS} FROM investors ORDER BY id OFFSET $1 LIMIT $2"
        ))
        .bind(page.offset())
        .bind(page.limit())
        .fetch_all(&self.pool)
        .await?;

        Ok(investors)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Investor>> {
        let investor = sqlx::query_as::<_, Investor>(&format!(
            "SELECT {INVESTOR_COLUMNS} FROM investors WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(investor)
    }

    async fn create(&self, investor: &Investor) -> RepositoryResult<Investor> {
        let created = sqlx::query_as::<_, Investor>(&format!(
            r#"
            INSERT INTO investors (id, name, investor_type, email, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {INVESTOR_COLUMNS}
            "#
        ))
        .bind(investor.id)
        .bind(&investor.name)
        .bind(investor.investor_type)
        .bind(&investor.email)
        .bind(investor.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn count(&self) -> RepositoryResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM investors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl InvestmentRepository for PgStore {
    async fn list_by_fund(&self, fund_id: Uuid, page: Page) -> RepositoryResult<Vec<Investment>> {
        let investments = sqlx::query_as::<_, Investment>(&format!(
            r#"
            SELECT {INVESTMENT_COLUMNS}
            FROM investments
            WHERE fund_id = $1
            ORDER BY investment_date DESC, id ASC
            OFFSET $2 LIMIT $3
            "#
        ))
        .bind(fund_id)
        .bind(page.offset())
        .bind(page.limit())
        .fetch_all(&self.pool)
        .await?;

        Ok(investments)
    }

    async fn create(&self, investment: &Investment) -> RepositoryResult<Investment> {
        let created = sqlx::query_as::<_, Investment>(&format!(
            r#"
            INSERT INTO investments (id, fund_id, investor_id, amount_usd, investment_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {INVESTMENT_COLUMNS}
            "#
        ))
        .bind(investment.id)
        .bind(investment.fund_id)
        .bind(investment.investor_id)
        .bind(&investment.amount_usd)
        .bind(investment.investment_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn count(&self) -> RepositoryResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM investments")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl DatabaseProbe for PgStore {
    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
