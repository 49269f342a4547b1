//! Repository trait for visit statistics.

use crate::domain::entities::{RequestHeaders, VisitStat};
use crate::domain::storage::UserKey;
use crate::error::AppError;
use async_trait::async_trait;

/// Append-only visit log.
#[async_trait]
pub trait StatsRepository<K: UserKey>: Send + Sync + 'static {
    /// Records one redirect of link `short_link_id` owned by `owner` and
    /// returns the new visit id.
    async fn record_visit(
        &self,
        short_link_id: i64,
        headers: &RequestHeaders,
        owner: &K,
    ) -> Result<i64, AppError>;

    async fn find_by_short_id(&self, short_link_id: i64) -> Result<Vec<VisitStat<K>>, AppError>;

    /// Re-keys every visit of link `from` to `to` after the link was
    /// renumbered. Returns how many visits moved.
    async fn move_visits(&self, from: i64, to: i64) -> Result<u64, AppError>;

    async fn find_all_by_user(&self, owner: &K) -> Result<Vec<VisitStat<K>>, AppError>;
}
