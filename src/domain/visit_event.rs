//! Visit event passed from the redirect handler to the background worker.

use crate::domain::entities::RequestHeaders;

/// A redirect that still has to be written to the stats store.
///
/// Carries the owner so the worker never has to look the link up again.
#[derive(Debug, Clone)]
pub struct VisitEvent<K> {
    pub short_code: String,
    pub owner: K,
    pub headers: RequestHeaders,
}

impl<K> VisitEvent<K> {
    pub fn new(short_code: impl Into<String>, owner: K, headers: RequestHeaders) -> Self {
        Self {
            short_code: short_code.into(),
            owner,
            headers,
        }
    }
}
