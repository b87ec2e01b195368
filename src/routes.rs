//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `ANY /aka/{alias}` - Alias redirect or publish (rate limited)
//! - `ANY /aka`         - Empty alias, rejected (rate limited)
//! - `GET /health`      - Health check: storage, event queue
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on alias routes
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::rate_limit::RateLimitLayer;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the routes with all middleware except path normalization.
pub fn app_routes(state: AppState, rate_limit: RateLimitLayer) -> Router {
    let alias_router = api::routes::alias_routes().layer(rate_limit);

    Router::new()
        .merge(alias_router)
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application service.
///
/// Trailing slashes are trimmed before routing, so `/aka/` reaches the
/// empty-alias handler and `/aka/docs/` resolves `docs`.
pub fn app_router(state: AppState, rate_limit: RateLimitLayer) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(app_routes(state, rate_limit))
}
