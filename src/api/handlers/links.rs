//! Handlers for link management endpoints (create, list, renumber).

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::links::{
    LinkListResponse, LinkResponse, ShortenRequest, UpdateLinkRequest, UpdateLinkResponse,
};
use crate::api::middleware::auth::AuthUser;
use crate::domain::entities::ShortLink;
use crate::domain::storage::StorageBackend;
use crate::error::AppError;
use crate::state::AppState;

fn link_response<B: StorageBackend, K>(state: &AppState<B>, link: ShortLink<K>) -> LinkResponse {
    let code = link.code();
    LinkResponse {
        short_url: state.short_url(&code),
        code,
        long_url: link.long_url,
        created_at: link.created_at,
        updated_at: link.updated_at,
    }
}

/// Creates a short link owned by the caller.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/page" }
/// ```
///
/// The URL is normalized before it is stored (lowercase host, no default
/// port, no fragment).
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is not an absolute `http`/`https` URL.
pub async fn shorten_handler<B: StorageBackend>(
    State(state): State<AppState<B>>,
    Extension(user): Extension<AuthUser<B>>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .shorten(&payload.url, &user.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(link_response(&state, link))))
}

/// Lists the caller's links, ordered by id.
///
/// # Endpoint
///
/// `GET /api/links`
pub async fn list_links_handler<B: StorageBackend>(
    State(state): State<AppState<B>>,
    Extension(user): Extension<AuthUser<B>>,
) -> Result<Json<LinkListResponse>, AppError> {
    let mut links = state.link_service.list_for_user(&user.user_id).await?;
    links.sort_by_key(|link| link.id);

    let items: Vec<LinkResponse> = links
        .into_iter()
        .map(|link| link_response(&state, link))
        .collect();

    Ok(Json(LinkListResponse {
        total: items.len(),
        items,
    }))
}

/// Moves one of the caller's links to another short code.
///
/// # Endpoint
///
/// `PATCH /api/links/{code}`
///
/// # Request Body
///
/// ```json
/// { "code": "docs" }
/// ```
///
/// # Errors
///
/// - 400 if the new code is not a canonical short code
/// - 404 if `{code}` is not a link of the caller
/// - 409 if the new code is already in use
pub async fn update_link_handler<B: StorageBackend>(
    Path(code): Path<String>,
    State(state): State<AppState<B>>,
    Extension(user): Extension<AuthUser<B>>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<UpdateLinkResponse>, AppError> {
    payload.validate()?;

    let new_code = state
        .link_service
        .change_link(&code, &payload.code, &user.user_id)
        .await?;

    Ok(Json(UpdateLinkResponse {
        short_url: state.short_url(&new_code),
        old_code: code,
        code: new_code,
    }))
}
