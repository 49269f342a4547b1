//! Visit statistics entity.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Request headers captured with a visit: name to every value sent under it.
pub type RequestHeaders = BTreeMap<String, Vec<String>>;

/// One recorded redirect. Immutable once stored.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitStat<K> {
    pub id: i64,
    pub short_link_id: i64,
    pub owner: K,
    pub timestamp: DateTime<Utc>,
    pub request_headers: RequestHeaders,
}
