//! Session side-store trait.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::AppError;

/// Key-value store with per-entry expiry holding live token identifiers.
///
/// Keys are token UUIDs, values are the owning user id. Unlike a cache, the
/// store is authoritative: a missing key means the token was revoked or has
/// expired, and failures must surface as errors.
///
/// # Implementations
///
/// - [`crate::infrastructure::session::RedisSessionStore`] - Redis with native TTLs
/// - [`crate::infrastructure::session::MemorySessionStore`] - In-process map for single-node runs and tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores `value` under `key`, replacing any previous entry.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), AppError>;

    /// `Ok(None)` if the key is absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Removes `key` and returns how many entries were deleted (0 or 1).
    async fn delete(&self, key: &str) -> Result<u64, AppError>;

    async fn health_check(&self) -> bool;

    /// Short name reported by the health endpoint.
    fn backend(&self) -> &'static str;
}
