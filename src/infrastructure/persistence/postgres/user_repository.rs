//! PostgreSQL user store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::User;
use crate::domain::repositories::UserRepository;
use crate::domain::repositories::user_repository::{user_not_found, username_taken};
use crate::error::AppError;
use crate::utils::db_error::is_unique_violation_on;
use crate::utils::password::CredentialHasher;

const USERNAME_KEY: &str = "users_username_key";

#[derive(FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User<i64> {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            password_hash: row.password,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Accounts in the `users` table; uniqueness comes from `users_username_key`.
pub struct PgUserRepository {
    pool: Arc<PgPool>,
    hasher: CredentialHasher,
}

impl PgUserRepository {
    pub fn new(pool: Arc<PgPool>, hasher: CredentialHasher) -> Self {
        Self { pool, hasher }
    }
}

#[async_trait]
impl UserRepository<i64> for PgUserRepository {
    fn hasher(&self) -> &CredentialHasher {
        &self.hasher
    }

    async fn add_user(&self, username: &str, password: &str) -> Result<User<i64>, AppError> {
        let password_hash = self.hasher.hash_async(password).await?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, password)
            VALUES ($1, $2)
            RETURNING id, username, password, created_at, updated_at
            "#,
        )
        .bind(username)
        .bind(&password_hash)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation_on(&e, USERNAME_KEY) {
                username_taken(username)
            } else {
                e.into()
            }
        })?;

        Ok(row.into())
    }

    async fn user_exists(&self, username: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(self.pool.as_ref())
                .await?;
        Ok(exists)
    }

    async fn find_by_username(&self, username: &str) -> Result<User<i64>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password, created_at, updated_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Into::into).ok_or_else(|| user_not_found(username))
    }

    async fn find_all(&self) -> Result<Vec<User<i64>>, AppError> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password, created_at, updated_at FROM users ORDER BY id",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
