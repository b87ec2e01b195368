//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "writes_enabled": true,
///   "checks": {
///     "storage": { "status": "ok", "message": "Reachable, 12 aliases" },
///     "event_queue": { "status": "ok", "message": "Capacity: 10000" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let storage = check_storage(&state).await;
    let event_queue = check_event_queue(&state);

    let all_healthy = storage.is_ok() && event_queue.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        writes_enabled: state.alias_service.writes_enabled(),
        checks: HealthChecks {
            storage,
            event_queue,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_storage(state: &AppState) -> CheckStatus {
    match state.alias_service.count().await {
        Ok(count) => CheckStatus::ok(format!("Reachable, {} aliases", count)),
        Err(e) => CheckStatus::error(format!("Storage error: {}", e)),
    }
}

fn check_event_queue(state: &AppState) -> CheckStatus {
    if state.event_sender.is_closed() {
        CheckStatus::error("Event queue is closed")
    } else {
        CheckStatus::ok(format!("Capacity: {}", state.event_sender.capacity()))
    }
}
