//! Alias route configuration.

use crate::api::handlers::{alias_handler, empty_alias_handler};
use crate::state::AppState;
use axum::{Router, routing::any};

/// Alias routes.
///
/// # Endpoints
///
/// - `ANY /aka/{alias}` - Redirect (`GET`, `HEAD`, ...) or publish (`POST`, `PUT`)
/// - `ANY /aka`         - Empty alias, always `400 Bad Request`
///
/// Write authorization is checked inside the handler rather than by a route
/// layer, since reads and writes share the same path.
pub fn alias_routes() -> Router<AppState> {
    Router::new()
        .route("/aka", any(empty_alias_handler))
        .route("/aka/{alias}", any(alias_handler))
}
