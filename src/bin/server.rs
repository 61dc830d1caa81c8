//! # Private Markets Server
//!
//! Serves the fund, investor and investment API.
//!
//! ## Usage
//!
//! ```bash
//! # PostgreSQL backed
//! PM_DATABASE__URL=postgresql://localhost/markets cargo run --bin private-markets-server
//!
//! # In-memory store, no database required
//! PM_DATABASE__USE_IN_MEMORY=true cargo run --bin private-markets-server
//! ```

use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use private_markets::config::{AppConfig, ConfigManager};
use private_markets::database::{DatabaseConnection, DatabaseMigrations};
use private_markets::logging;
use private_markets::repository::{PgStore, Repositories};
use private_markets::web::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let manager = ConfigManager::load().context("Failed to load configuration")?;
    let config = Arc::new(manager.config().clone());

    logging::init_structured_logging(&config.logging);

    info!("🚀 Starting Private Markets Server...");
    info!("   Version: {}", env!("CARGO_PKG_VERSION"));
    info!("   Environment: {}", manager.environment());

    let (repositories, connection) = build_repositories(&config).await?;

    let state = AppState::new(repositories, config.clone());
    let app = web::create_app(state);

    let listener = TcpListener::bind(&config.web.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.web.bind_address))?;
    info!("🎉 Listening on {}", config.web.bind_address);
    info!("   Press Ctrl+C to shutdown gracefully");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("🛑 Shutdown signal received, closing resources...");
    if let Some(connection) = connection {
        connection.close().await;
        info!("✅ Database pool closed");
    }

    info!("👋 Private Markets Server shutdown complete");
    Ok(())
}

async fn build_repositories(
    config: &AppConfig,
) -> anyhow::Result<(Repositories, Option<DatabaseConnection>)> {
    if config.database.use_in_memory {
        info!("   Storage: in-memory");
        return Ok((Repositories::in_memory(), None));
    }

    let connection = DatabaseConnection::connect_lazy(&config.database)
        .context("Failed to configure database pool")?;

    if config.database.run_migrations {
        DatabaseMigrations::run_all(connection.pool())
            .await
            .context("Failed to run database migrations")?;
    }

    info!("   Storage: PostgreSQL");
    let store = Arc::new(PgStore::new(connection.pool().clone()));
    Ok((Repositories::from_store(store), Some(connection)))
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        },
        _ = terminate => {
            info!("Received SIGTERM");
        },
    }
}
