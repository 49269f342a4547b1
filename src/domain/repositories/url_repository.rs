//! Repository trait for short links.

use crate::domain::entities::ShortLink;
use crate::domain::storage::UserKey;
use crate::error::AppError;
use crate::utils::codec::try_decode;
use async_trait::async_trait;
use serde_json::json;

/// Persistent mapping from link id to long URL.
///
/// # Id allocation
///
/// [`UrlRepository::save`] assigns `max(existing ids) + 1`. Reading the
/// maximum and inserting must behave as one step: concurrent saves on the same
/// store never return the same id.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::memory::MemoryUrlRepository`]
/// - [`crate::infrastructure::persistence::mongo::MongoUrlRepository`]
/// - [`crate::infrastructure::persistence::postgres::PgUrlRepository`]
#[async_trait]
pub trait UrlRepository<K: UserKey>: Send + Sync + 'static {
    /// Stores `long_url` for `owner` and returns the allocated id.
    async fn save(&self, long_url: &str, owner: &K) -> Result<i64, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    async fn find_by_id(&self, id: i64) -> Result<ShortLink<K>, AppError>;

    /// Renumbers link `id` to the id `new_code` decodes to and returns it.
    ///
    /// Updating a link to its own code is a no-op.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if `new_code` is not a canonical short code
    /// - [`AppError::NotFound`] if link `id` does not exist
    /// - [`AppError::Conflict`] if the target id is already taken
    async fn update(&self, id: i64, new_code: &str) -> Result<i64, AppError>;

    /// All links owned by `owner`, in no particular order.
    async fn find_all_by_user(&self, owner: &K) -> Result<Vec<ShortLink<K>>, AppError>;

    async fn find_all(&self) -> Result<Vec<ShortLink<K>>, AppError>;
}

/// Decodes the code a link is being moved to.
pub fn target_id(new_code: &str) -> Result<i64, AppError> {
    try_decode(new_code).ok_or_else(|| {
        AppError::bad_request(
            "Invalid short code",
            json!({ "code": new_code, "reason": "Expected a canonical base-62 code" }),
        )
    })
}

pub fn link_not_found(id: i64) -> AppError {
    AppError::not_found("Short link not found", json!({ "id": id }))
}

pub fn code_taken(new_code: &str) -> AppError {
    AppError::conflict(
        "Short code is already in use",
        json!({ "code": new_code }),
    )
}
