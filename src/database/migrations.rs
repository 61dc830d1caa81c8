//! # Database Migration System
//!
//! Schema migrations live in `migrations/` using the timestamp naming
//! convention `YYYYMMDDHHMMSS_description.sql` and are embedded into the
//! binary at compile time.
//!
//! `sqlx` takes a PostgreSQL advisory lock while applying them, so several
//! replicas starting at once do not race each other.

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use tracing::info;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Applies the embedded schema migrations
pub struct DatabaseMigrations;

impl DatabaseMigrations {
    /// Run all outstanding migrations in order
    pub async fn run_all(pool: &PgPool) -> Result<(), MigrateError> {
        info!(
            available = MIGRATOR.iter().count(),
            "Applying database migrations"
        );
        MIGRATOR.run(pool).await?;
        info!("Database schema up to date");
        Ok(())
    }
}
