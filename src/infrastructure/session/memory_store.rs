//! In-process session store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::service::SessionStore;
use crate::error::AppError;

/// Session entries in a map; expired entries are dropped on access and
/// swept on every write.
///
/// Entries are lost on restart and not shared between processes.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, (String, Instant)>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), AppError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, (_, expires)| *expires > now);
        entries.insert(key.to_string(), (value.to_string(), now + ttl));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|(_, expires)| *expires > Instant::now())
            .map(|(value, _)| value.clone()))
    }

    async fn delete(&self, key: &str) -> Result<u64, AppError> {
        let mut entries = self.entries.write().await;
        match entries.remove(key) {
            Some((_, expires)) if expires > Instant::now() => Ok(1),
            _ => Ok(0),
        }
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
