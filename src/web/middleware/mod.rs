//! # Web API Middleware
//!
//! Request ID propagation, request timing, gzip compression and CORS.

pub mod request_id;
pub mod timing;

use axum::http::HeaderValue;
use axum::middleware;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::compression::predicate::SizeAbove;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::WebConfig;
use crate::web::state::AppState;

pub use request_id::RequestId;

/// Apply the middleware stack, outermost first: request ID, timing,
/// compression, tracing, CORS
pub fn apply_middleware_stack(router: Router<AppState>, config: &WebConfig) -> Router<AppState> {
    router.layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn(request_id::add_request_id))
            .layer(middleware::from_fn_with_state(
                config.slow_request_threshold(),
                timing::record_process_time,
            ))
            .layer(
                CompressionLayer::new().compress_when(SizeAbove::new(config.compression_min_size)),
            )
            .layer(TraceLayer::new_for_http())
            .layer(create_cors_layer(&config.cors_origins)),
    )
}

/// `*` allows any origin; otherwise only the listed origins
fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}
