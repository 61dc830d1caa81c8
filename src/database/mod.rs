//! # Database Operations
//!
//! PostgreSQL plumbing behind [`PgStore`](crate::repository::PgStore).
//!
//! ## Key Components
//!
//! - [`connection`] - Pool construction from [`DatabaseConfig`](crate::config::DatabaseConfig)
//! - [`error_codes`] - SQLSTATE constants used to classify driver errors
//! - [`migrations`] - Embedded schema migrations

pub mod connection;
pub mod error_codes;
pub mod migrations;

pub use connection::DatabaseConnection;
pub use error_codes::PgErrorCode;
pub use migrations::DatabaseMigrations;
