//! Handlers for visit statistics.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::api::dto::stats::{StatsResponse, VisitInfo};
use crate::api::middleware::auth::AuthUser;
use crate::domain::entities::VisitStat;
use crate::domain::storage::StorageBackend;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::codec::encode;

fn stats_response<K>(code: Option<String>, mut visits: Vec<VisitStat<K>>) -> StatsResponse {
    visits.sort_by_key(|visit| visit.id);

    let items: Vec<VisitInfo> = visits
        .into_iter()
        .map(|visit| VisitInfo {
            id: visit.id,
            code: encode(visit.short_link_id),
            visited_at: visit.timestamp,
            headers: visit.request_headers,
        })
        .collect();

    StatsResponse {
        code,
        total: items.len(),
        items,
    }
}

/// Visits across all of the caller's links.
///
/// # Endpoint
///
/// `GET /api/stats`
pub async fn stats_handler<B: StorageBackend>(
    State(state): State<AppState<B>>,
    Extension(user): Extension<AuthUser<B>>,
) -> Result<Json<StatsResponse>, AppError> {
    let visits = state.stats_service.list_for_user(&user.user_id).await?;

    Ok(Json(stats_response(None, visits)))
}

/// Visits of one of the caller's links.
///
/// # Endpoint
///
/// `GET /api/stats/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown or owned by someone else.
pub async fn link_stats_handler<B: StorageBackend>(
    Path(code): Path<String>,
    State(state): State<AppState<B>>,
    Extension(user): Extension<AuthUser<B>>,
) -> Result<Json<StatsResponse>, AppError> {
    let visits = state
        .stats_service
        .list_for_link(&code, &user.user_id)
        .await?;

    Ok(Json(stats_response(Some(code), visits)))
}
