//! PostgreSQL visit log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{RequestHeaders, VisitStat};
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;

#[derive(FromRow)]
struct VisitRow {
    id: i64,
    short_id: i64,
    user_id: i64,
    visited_at: DateTime<Utc>,
    headers: Json<RequestHeaders>,
}

impl From<VisitRow> for VisitStat<i64> {
    fn from(row: VisitRow) -> Self {
        VisitStat {
            id: row.id,
            short_link_id: row.short_id,
            owner: row.user_id,
            timestamp: row.visited_at,
            request_headers: row.headers.0,
        }
    }
}

/// Visits in the `visits` table. Ids come from its `BIGSERIAL`.
pub struct PgStatsRepository {
    pool: Arc<PgPool>,
}

impl PgStatsRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsRepository<i64> for PgStatsRepository {
    async fn record_visit(
        &self,
        short_link_id: i64,
        headers: &RequestHeaders,
        owner: &i64,
    ) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO visits (short_id, user_id, headers) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(short_link_id)
        .bind(owner)
        .bind(Json(headers.clone()))
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(id)
    }

    async fn find_by_short_id(&self, short_link_id: i64) -> Result<Vec<VisitStat<i64>>, AppError> {
        let rows = sqlx::query_as::<_, VisitRow>(
            r#"
            SELECT id, short_id, user_id, visited_at, headers
            FROM visits
            WHERE short_id = $1
            ORDER BY id
            "#,
        )
        .bind(short_link_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn move_visits(&self, from: i64, to: i64) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE visits SET short_id = $1 WHERE short_id = $2")
            .bind(to)
            .bind(from)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn find_all_by_user(&self, owner: &i64) -> Result<Vec<VisitStat<i64>>, AppError> {
        let rows = sqlx::query_as::<_, VisitRow>(
            r#"
            SELECT id, short_id, user_id, visited_at, headers
            FROM visits
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(owner)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
