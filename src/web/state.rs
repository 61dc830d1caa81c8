//! # Web API Application State

use crate::config::AppConfig;
use crate::repository::Repositories;
use crate::services::Services;
use std::sync::Arc;

/// Shared state handed to every request handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub services: Services,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(repositories: Repositories, config: Arc<AppConfig>) -> Self {
        Self {
            services: Services::new(repositories, &config),
            config,
        }
    }
}
