//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`   - Short link redirect (public)
//! - `GET  /health`   - Health check: session store, visit queue (public)
//! - `/auth/*`        - Registration, login, refresh (public), logout (Bearer)
//! - `/api/*`         - REST API (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Authentication** - JWT access token checked against the session store
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, tracing};
use crate::domain::storage::StorageBackend;
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router<B: StorageBackend>(state: AppState<B>) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

/// Every route and middleware except path normalization, which has to wrap
/// the router from outside.
pub fn router<B: StorageBackend>(state: AppState<B>) -> Router {
    let require_token = middleware::from_fn_with_state(state.clone(), auth::layer::<B>);

    let api_router = api::routes::protected_routes::<B>().route_layer(require_token.clone());

    let auth_router = api::routes::auth_routes::<B>()
        .merge(api::routes::session_routes::<B>().route_layer(require_token));

    Router::new()
        .route("/health", get(health_handler::<B>))
        .route("/{code}", get(redirect_handler::<B>))
        .nest("/auth", auth_router)
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer())
}
