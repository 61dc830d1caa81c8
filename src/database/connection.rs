use crate::config::{ConfigurationError, DatabaseConfig};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tracing::info;

/// Owns the PostgreSQL pool for the lifetime of the process
#[derive(Debug, Clone)]
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Build a pool from configuration; connections are opened lazily
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self, ConfigurationError> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| ConfigurationError::missing_required_field("database.url", "database"))?;

        let pool = Self::pool_options(config)
            .connect_lazy(url)
            .map_err(|e| ConfigurationError::invalid_value("database.url", "<redacted>", e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Database pool configured"
        );

        Ok(Self { pool })
    }

    /// Build a pool and open the first connection eagerly
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let url = config.url.as_deref().unwrap_or_default();
        let pool = Self::pool_options(config).connect(url).await?;

        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Database pool connected"
        );

        Ok(Self { pool })
    }

    fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout())
            .idle_timeout(Some(config.idle_timeout()))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 as health")
            .fetch_one(&self.pool)
            .await?;

        let health: i32 = row.get("health");
        Ok(health == 1)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}
