//! DTOs for visit statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One recorded redirect.
#[derive(Debug, Serialize, Deserialize)]
pub struct VisitInfo {
    pub id: i64,
    pub code: String,
    pub visited_at: DateTime<Utc>,
    pub headers: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    /// Set when the response covers a single link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub total: usize,
    pub items: Vec<VisitInfo>,
}
