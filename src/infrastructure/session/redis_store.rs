//! Redis-backed session store.

use super::service::SessionStore;
use crate::error::AppError;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info};

/// Session entries as Redis strings with `SET EX` expiry.
///
/// Uses `ConnectionManager` for automatic reconnects. Errors propagate: an
/// unreachable store fails logins and authenticated requests.
pub struct RedisSessionStore {
    client: ConnectionManager,
    key_prefix: String,
}

impl RedisSessionStore {
    /// Connects and validates the connection with a PING.
    pub async fn connect(redis_url: &str) -> Result<Self, AppError> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;

        let mut test_conn = manager.clone();
        test_conn.ping::<()>().await?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            key_prefix: "littleu:session:".to_string(),
        })
    }

    fn build_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), AppError> {
        let mut conn = self.client.clone();
        // SET EX rejects 0.
        let seconds = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(self.build_key(key), value, seconds)
            .await?;
        debug!("Session SET {} (TTL: {}s)", key, seconds);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let mut conn = self.client.clone();
        Ok(conn.get::<_, Option<String>>(self.build_key(key)).await?)
    }

    async fn delete(&self, key: &str) -> Result<u64, AppError> {
        let mut conn = self.client.clone();
        let deleted = conn.del::<_, u64>(self.build_key(key)).await?;
        debug!("Session DEL {} ({} removed)", key, deleted);
        Ok(deleted)
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
