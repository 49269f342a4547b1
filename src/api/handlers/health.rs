//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::domain::storage::StorageBackend;
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
///   "engine": "postgresql",
///   "checks": {
///     "session_store": { "status": "ok", "message": "redis reachable" },
///     "visit_queue": { "status": "ok", "message": "Capacity: 10000" }
///   }
/// }
/// ```
pub async fn health_handler<B: StorageBackend>(
    State(state): State<AppState<B>>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let session_store = check_session_store(&state).await;
    let visit_queue = check_visit_queue(&state);

    let all_healthy = session_store.is_ok() && visit_queue.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        engine: B::ENGINE.to_string(),
        checks: HealthChecks {
            session_store,
            visit_queue,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_session_store<B: StorageBackend>(state: &AppState<B>) -> CheckStatus {
    let backend = state.auth_service.store_backend();

    if state.auth_service.health_check().await {
        CheckStatus::ok(format!("{} reachable", backend))
    } else {
        CheckStatus::error(format!("{} unreachable", backend))
    }
}

fn check_visit_queue<B: StorageBackend>(state: &AppState<B>) -> CheckStatus {
    match &state.visit_sender {
        None => CheckStatus::ok("Visit recording disabled"),
        Some(sender) if sender.is_closed() => CheckStatus::error("Visit queue is closed"),
        Some(sender) => CheckStatus::ok(format!("Capacity: {}", sender.capacity())),
    }
}
