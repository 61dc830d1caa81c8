//! # Web API
//!
//! axum router exposing the entity services under the configured API prefix,
//! plus `/health` at the root.

pub mod handlers;
pub mod middleware;
pub mod response_types;
pub mod state;

use axum::routing::get;
use axum::Router;
use tracing::info;

pub use response_types::{ApiError, ApiResult};
pub use state::AppState;

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/funds",
            get(handlers::funds::list_funds)
                .post(handlers::funds::create_fund)
                .put(handlers::funds::update_fund),
        )
        .route("/funds/:id", get(handlers::funds::get_fund))
        .route(
            "/funds/:id/investments",
            get(handlers::investments::list_investments)
                .post(handlers::investments::create_investment),
        )
        .route(
            "/investors",
            get(handlers::investors::list_investors).post(handlers::investors::create_investor),
        )
}

/// Build the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let prefix = state.config.web.api_prefix.trim_end_matches('/').to_string();

    let router = Router::new().route("/health", get(handlers::health::health_check));
    let router = if prefix.is_empty() {
        router.merge(api_routes())
    } else {
        router.nest(&prefix, api_routes())
    };

    let app = middleware::apply_middleware_stack(router, &state.config.web).with_state(state);

    info!(api_prefix = %prefix, "Web application created with all routes and middleware");
    app
}
