//! Handlers for account and session endpoints.

use axum::{Extension, Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::auth::{CredentialsRequest, RefreshRequest, TokenResponse};
use crate::api::middleware::auth::AuthUser;
use crate::domain::storage::StorageBackend;
use crate::error::AppError;
use crate::state::AppState;

/// Creates an account and signs the new user in.
///
/// # Endpoint
///
/// `POST /auth/register`
///
/// # Request Body
///
/// ```json
/// { "username": "bob", "password": "secret123" }
/// ```
///
/// # Errors
///
/// - 400 if either field is blank
/// - 409 if the username is taken
pub async fn register_handler<B: StorageBackend>(
    State(state): State<AppState<B>>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    payload.validate()?;

    let user = state
        .user_service
        .register(&payload.username, &payload.password)
        .await?;
    let tokens = state.auth_service.start_session(&user.id).await?;

    Ok((StatusCode::CREATED, Json(TokenResponse::new(&user.id, tokens))))
}

/// Exchanges credentials for a token pair.
///
/// # Endpoint
///
/// `POST /auth/login`
///
/// # Errors
///
/// Returns 401 with the same body for unknown users and wrong passwords.
pub async fn login_handler<B: StorageBackend>(
    State(state): State<AppState<B>>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    payload.validate()?;

    let user = state
        .user_service
        .authenticate(&payload.username, &payload.password)
        .await?;
    let tokens = state.auth_service.start_session(&user.id).await?;

    tracing::debug!(user_id = %user.id, "User logged in");
    Ok(Json(TokenResponse::new(&user.id, tokens)))
}

/// Rotates a refresh token.
///
/// # Endpoint
///
/// `POST /auth/refresh`
///
/// The presented refresh token is consumed; reusing it fails with 401.
pub async fn refresh_handler<B: StorageBackend>(
    State(state): State<AppState<B>>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    payload.validate()?;

    let (user_id, tokens) = state
        .auth_service
        .refresh::<B::UserId>(&payload.refresh_token)
        .await?;

    Ok(Json(TokenResponse::new(&user_id, tokens)))
}

/// Revokes the access token used for this request.
///
/// # Endpoint
///
/// `POST /auth/logout` (Bearer token required)
pub async fn logout_handler<B: StorageBackend>(
    State(state): State<AppState<B>>,
    Extension(user): Extension<AuthUser<B>>,
) -> Result<StatusCode, AppError> {
    state.auth_service.logout(&user.access_id).await?;

    tracing::debug!(user_id = %user.user_id, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}
