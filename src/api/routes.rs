//! API route configuration.
//!
//! Everything returned by [`protected_routes`] requires Bearer token
//! authentication via [`crate::api::middleware::auth`].

use crate::api::handlers::{
    link_stats_handler, list_links_handler, login_handler, logout_handler, refresh_handler,
    register_handler, shorten_handler, stats_handler, update_link_handler,
};
use crate::domain::storage::StorageBackend;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post},
};

/// Routes under `/auth` that work without a token.
///
/// - `POST /register` - Create an account and sign in
/// - `POST /login`    - Exchange credentials for tokens
/// - `POST /refresh`  - Rotate a refresh token
pub fn auth_routes<B: StorageBackend>() -> Router<AppState<B>> {
    Router::new()
        .route("/register", post(register_handler::<B>))
        .route("/login", post(login_handler::<B>))
        .route("/refresh", post(refresh_handler::<B>))
}

/// Routes under `/auth` that need a live access token.
///
/// - `POST /logout` - Revoke the presented access token
pub fn session_routes<B: StorageBackend>() -> Router<AppState<B>> {
    Router::new().route("/logout", post(logout_handler::<B>))
}

/// All `/api` routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `POST  /shorten`       - Create a short link
/// - `GET   /links`         - List own links
/// - `PATCH /links/{code}`  - Move a link to another code
/// - `GET   /stats`         - Visits of all own links
/// - `GET   /stats/{code}`  - Visits of one own link
pub fn protected_routes<B: StorageBackend>() -> Router<AppState<B>> {
    Router::new()
        .route("/shorten", post(shorten_handler::<B>))
        .route("/links", get(list_links_handler::<B>))
        .route("/links/{code}", patch(update_link_handler::<B>))
        .route("/stats", get(stats_handler::<B>))
        .route("/stats/{code}", get(link_stats_handler::<B>))
}
