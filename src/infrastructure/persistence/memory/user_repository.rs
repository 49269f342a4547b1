//! In-process user store.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tokio::sync::RwLock;

use crate::domain::entities::User;
use crate::domain::repositories::UserRepository;
use crate::domain::repositories::user_repository::{user_not_found, username_taken};
use crate::error::AppError;
use crate::utils::password::CredentialHasher;

/// Accounts keyed by username. Ids are random `u64`s.
pub struct MemoryUserRepository {
    users: RwLock<HashMap<String, User<u64>>>,
    hasher: CredentialHasher,
}

impl MemoryUserRepository {
    pub fn new(hasher: CredentialHasher) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            hasher,
        }
    }
}

#[async_trait]
impl UserRepository<u64> for MemoryUserRepository {
    fn hasher(&self) -> &CredentialHasher {
        &self.hasher
    }

    async fn add_user(&self, username: &str, password: &str) -> Result<User<u64>, AppError> {
        // Hash before locking so a slow work factor does not block the store.
        let password_hash = self.hasher.hash_async(password).await?;

        let mut users = self.users.write().await;

        let id = loop {
            let candidate = rand::random::<u64>();
            if !users.values().any(|u| u.id == candidate) {
                break candidate;
            }
        };

        match users.entry(username.to_string()) {
            Entry::Occupied(_) => Err(username_taken(username)),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let user = User {
                    id,
                    username: username.to_string(),
                    password_hash,
                    created_at: now,
                    updated_at: now,
                };
                Ok(slot.insert(user).clone())
            }
        }
    }

    async fn user_exists(&self, username: &str) -> Result<bool, AppError> {
        Ok(self.users.read().await.contains_key(username))
    }

    async fn find_by_username(&self, username: &str) -> Result<User<u64>, AppError> {
        self.users
            .read()
            .await
            .get(username)
            .cloned()
            .ok_or_else(|| user_not_found(username))
    }

    async fn find_all(&self) -> Result<Vec<User<u64>>, AppError> {
        Ok(self.users.read().await.values().cloned().collect())
    }
}
