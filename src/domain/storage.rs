//! Storage engine abstraction.
//!
//! A [`StorageBackend`] names the user key type of an engine together with its
//! three stores. [`Storage`] bundles one instance of each store and is built
//! once at start-up, then shared by every service.
//!
//! Because the owner key is an associated type, a store can only ever receive
//! owner references produced by the same engine.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use mongodb::bson::oid::ObjectId;

use crate::domain::repositories::{StatsRepository, UrlRepository, UserRepository};

/// Key identifying a user within one storage engine.
///
/// Keys travel through JWT claims and the session side-store as strings, so
/// they must round-trip through [`fmt::Display`] and [`UserKey::parse_key`].
pub trait UserKey: Clone + fmt::Debug + fmt::Display + Eq + Hash + Send + Sync + 'static {
    fn parse_key(raw: &str) -> Option<Self>;
}

impl UserKey for u64 {
    fn parse_key(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl UserKey for i64 {
    fn parse_key(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl UserKey for ObjectId {
    fn parse_key(raw: &str) -> Option<Self> {
        ObjectId::parse_str(raw).ok()
    }
}

pub trait StorageBackend: Send + Sync + 'static {
    /// Value of `DB_ENGINE` selecting this backend.
    const ENGINE: &'static str;

    type UserId: UserKey;
    type Urls: UrlRepository<Self::UserId>;
    type Users: UserRepository<Self::UserId>;
    type Stats: StatsRepository<Self::UserId>;
}

/// One URL store, user store and stats store of the same engine.
pub struct Storage<B: StorageBackend> {
    pub urls: Arc<B::Urls>,
    pub users: Arc<B::Users>,
    pub stats: Arc<B::Stats>,
}

impl<B: StorageBackend> Storage<B> {
    pub fn new(urls: B::Urls, users: B::Users, stats: B::Stats) -> Self {
        Self {
            urls: Arc::new(urls),
            users: Arc::new(users),
            stats: Arc::new(stats),
        }
    }
}

impl<B: StorageBackend> Clone for Storage<B> {
    fn clone(&self) -> Self {
        Self {
            urls: self.urls.clone(),
            users: self.users.clone(),
            stats: self.stats.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_key_round_trip() {
        assert_eq!(u64::parse_key(&42u64.to_string()), Some(42));
        assert_eq!(i64::parse_key("-7"), Some(-7));
        assert_eq!(u64::parse_key("abc"), None);

        let oid = ObjectId::new();
        assert_eq!(ObjectId::parse_key(&oid.to_string()), Some(oid));
        assert_eq!(ObjectId::parse_key("42"), None);
    }
}
