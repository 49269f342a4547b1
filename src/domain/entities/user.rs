//! User account entity.

use chrono::{DateTime, Utc};
use std::fmt;

/// A registered account. `password_hash` is a bcrypt digest and is never
/// printed by `Debug`.
#[derive(Clone, PartialEq)]
pub struct User<K> {
    pub id: K,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<K: fmt::Debug> fmt::Debug for User<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}
