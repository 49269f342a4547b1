//! PostgreSQL link store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use std::sync::Arc;

use crate::domain::entities::ShortLink;
use crate::domain::repositories::UrlRepository;
use crate::domain::repositories::url_repository::{code_taken, link_not_found, target_id};
use crate::error::AppError;
use crate::utils::db_error::is_unique_violation_on;

/// Advisory lock serializing id allocation and renumbering on `urls`.
const URL_ID_LOCK: i64 = 0x6c69_7474_6c65_75;

const URL_PKEY: &str = "urls_pkey";

#[derive(FromRow)]
struct UrlRow {
    short_id: i64,
    url: String,
    user_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UrlRow> for ShortLink<i64> {
    fn from(row: UrlRow) -> Self {
        ShortLink::new(
            row.short_id,
            row.url,
            row.user_id,
            row.created_at,
            row.updated_at,
        )
    }
}

/// Links in the `urls` table.
///
/// `save` and `update` run in a transaction holding a transaction-scoped
/// advisory lock, so `MAX(short_id) + 1` and the insert are one step for
/// every writer. The primary key on `short_id` backs this up.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn lock(tx: &mut Transaction<'_, Postgres>) -> Result<(), AppError> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(URL_ID_LOCK)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn exists(tx: &mut Transaction<'_, Postgres>, id: i64) -> Result<bool, AppError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT short_id FROM urls WHERE short_id = $1")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(found.is_some())
    }
}

#[async_trait]
impl UrlRepository<i64> for PgUrlRepository {
    async fn save(&self, long_url: &str, owner: &i64) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;
        Self::lock(&mut tx).await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO urls (short_id, url, user_id)
            SELECT COALESCE(MAX(short_id), 0) + 1, $1, $2 FROM urls
            RETURNING short_id
            "#,
        )
        .bind(long_url)
        .bind(owner)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(id)
    }

    async fn find_by_id(&self, id: i64) -> Result<ShortLink<i64>, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(
            "SELECT short_id, url, user_id, created_at, updated_at FROM urls WHERE short_id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Into::into).ok_or_else(|| link_not_found(id))
    }

    async fn update(&self, id: i64, new_code: &str) -> Result<i64, AppError> {
        let new_id = target_id(new_code)?;

        let mut tx = self.pool.begin().await?;
        Self::lock(&mut tx).await?;

        if !Self::exists(&mut tx, id).await? {
            return Err(link_not_found(id));
        }
        if new_id == id {
            return Ok(id);
        }
        if Self::exists(&mut tx, new_id).await? {
            return Err(code_taken(new_code));
        }

        sqlx::query("UPDATE urls SET short_id = $1, updated_at = NOW() WHERE short_id = $2")
            .bind(new_id)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation_on(&e, URL_PKEY) {
                    code_taken(new_code)
                } else {
                    e.into()
                }
            })?;

        tx.commit().await?;
        Ok(new_id)
    }

    async fn find_all_by_user(&self, owner: &i64) -> Result<Vec<ShortLink<i64>>, AppError> {
        let rows = sqlx::query_as::<_, UrlRow>(
            "SELECT short_id, url, user_id, created_at, updated_at FROM urls WHERE user_id = $1",
        )
        .bind(owner)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_all(&self) -> Result<Vec<ShortLink<i64>>, AppError> {
        let rows = sqlx::query_as::<_, UrlRow>(
            "SELECT short_id, url, user_id, created_at, updated_at FROM urls ORDER BY short_id",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
