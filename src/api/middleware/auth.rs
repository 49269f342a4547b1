//! Bearer token authentication middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::application::services::AccessDetails;
use crate::domain::storage::StorageBackend;
use crate::{error::AppError, state::AppState};

/// Identity of the caller, inserted as a request extension by [`layer`].
pub type AuthUser<B> = AccessDetails<<B as StorageBackend>::UserId>;

/// Authenticates requests using JWT access tokens from the Authorization header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Authentication Flow
///
/// 1. Split the header into scheme and token
/// 2. Verify the token signature and expiry
/// 3. Look the token id up in the session side-store
/// 4. Insert the caller's [`AuthUser`] into request extensions
///
/// # Errors
///
/// Returns `401 Unauthorized` if the header is missing or malformed, the
/// token does not verify, or it was revoked. The cause is not disclosed.
///
/// Adds `WWW-Authenticate: Bearer` header to 401 responses per RFC 6750.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware};
/// use littleu::api::middleware::auth;
///
/// let protected = Router::new()
///     .route("/api/links", get(list_links_handler::<B>))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer::<B>));
/// ```
pub async fn layer<B: StorageBackend>(
    State(st): State<AppState<B>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user: AuthUser<B> = st.auth_service.authenticate(req.headers()).await?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
