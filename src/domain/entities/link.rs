//! Short link entity.

use chrono::{DateTime, Utc};

use crate::utils::codec::encode;

/// A long URL stored under a numeric id.
///
/// The id is the only persisted identity; the public short code is always
/// derived from it with [`ShortLink::code`].
#[derive(Debug, Clone, PartialEq)]
pub struct ShortLink<K> {
    pub id: i64,
    pub long_url: String,
    pub owner: K,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<K> ShortLink<K> {
    pub fn new(
        id: i64,
        long_url: String,
        owner: K,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            long_url,
            owner,
            created_at,
            updated_at,
        }
    }

    /// Base-62 short code for this link.
    pub fn code(&self) -> String {
        encode(self.id)
    }
}
