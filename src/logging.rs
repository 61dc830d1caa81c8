//! # Structured Logging Module
//!
//! Console output for operators plus, when a log directory is configured, a
//! daily-rolling JSON file for later analysis.

use crate::config::LoggingConfig;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<Option<WorkerGuard>> = OnceLock::new();

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.effective_level()))
}

/// Initialize structured logging once per process.
///
/// `RUST_LOG` takes precedence over the configured level. An already
/// installed global subscriber is left in place.
pub fn init_structured_logging(config: &LoggingConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let console_layer = if config.json_console {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .json()
                .with_filter(env_filter(config))
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(true)
                .with_filter(env_filter(config))
                .boxed()
        };

        let mut guard = None;
        let mut log_path = None;
        let file_layer = config.directory.as_ref().and_then(|dir| {
            let log_dir = PathBuf::from(dir);
            if let Err(e) = fs::create_dir_all(&log_dir) {
                eprintln!("Failed to create log directory {}: {e}", log_dir.display());
                return None;
            }

            let file_appender = tracing_appender::rolling::daily(&log_dir, "private-markets.log");
            let (file_writer, worker_guard) = tracing_appender::non_blocking(file_appender);
            guard = Some(worker_guard);
            log_path = Some(log_dir);

            Some(
                fmt::layer()
                    .with_writer(file_writer)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_level(true)
                    .with_ansi(false)
                    .json()
                    .with_filter(env_filter(config))
                    .boxed(),
            )
        });

        let subscriber = tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer);

        if subscriber.try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(
            pid = process::id(),
            level = config.effective_level(),
            log_dir = ?log_path,
            "🔧 Structured logging initialized"
        );

        // Kept for the life of the process so buffered lines are flushed
        guard
    });
}
