#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Private Markets Core
//!
//! Service core for a private-markets fund administration API: funds,
//! investors and the investments linking them.
//!
//! ## Overview
//!
//! Every persistence call made by the services passes through a shared
//! circuit breaker (and, for reads, retry with exponential backoff). Reads
//! are served from an in-process TTL cache that is invalidated by prefix
//! after each successful write. Funds move one way through
//! `Fundraising → Investing → Closed`, and closed funds accept no new
//! capital.
//!
//! ## Module Organization
//!
//! - [`cache`] - TTL cache with FIFO eviction and prefix invalidation
//! - [`resilience`] - Circuit breaker, retry policy and the database guard
//! - [`state_machine`] - Fund lifecycle states and transition guard
//! - [`models`] - Funds, investors, investments and their input payloads
//! - [`validation`] - Field-level payload checks
//! - [`repository`] - Persistence traits with PostgreSQL and in-memory stores
//! - [`database`] - Pool construction, SQLSTATE classification, migrations
//! - [`services`] - Entity services and the health snapshot
//! - [`web`] - axum HTTP layer
//! - [`config`] - Layered configuration
//! - [`logging`] - Structured logging bootstrap
//! - [`error`] - Error taxonomy
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bigdecimal::BigDecimal;
//! use private_markets::config::AppConfig;
//! use private_markets::models::{FundStatus, NewFund, Page};
//! use private_markets::repository::Repositories;
//! use private_markets::services::Services;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let services = Services::new(Repositories::in_memory(), &AppConfig::in_memory());
//!
//! let fund = services
//!     .funds
//!     .create(NewFund {
//!         name: "Growth Fund I".to_string(),
//!         vintage_year: 2024,
//!         target_size_usd: BigDecimal::from(250_000_000),
//!         status: FundStatus::Fundraising,
//!     })
//!     .await?;
//!
//! let funds = services.funds.list(Page::default()).await?;
//! assert_eq!(funds[0].id, fund.id);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;
pub mod resilience;
pub mod services;
pub mod state_machine;
pub mod validation;
pub mod web;

pub use error::{RepositoryError, RepositoryResult, ServiceError, ServiceResult};
