//! PostgreSQL storage engine (`DB_ENGINE=postgresql`).
//!
//! Queries are built at runtime with `sqlx::query*`, so building the crate
//! does not need a live database. The schema lives in `migrations/` and is
//! applied on connect.

mod stats_repository;
mod url_repository;
mod user_repository;

pub use stats_repository::PgStatsRepository;
pub use url_repository::PgUrlRepository;
pub use user_repository::PgUserRepository;

use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::domain::storage::{Storage, StorageBackend};
use crate::utils::password::CredentialHasher;

pub struct PostgresBackend;

impl StorageBackend for PostgresBackend {
    const ENGINE: &'static str = "postgresql";

    type UserId = i64;
    type Urls = PgUrlRepository;
    type Users = PgUserRepository;
    type Stats = PgStatsRepository;
}

/// Opens the pool described by `config` and applies pending migrations.
pub async fn connect(config: &Config) -> Result<PgPool> {
    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set for the postgresql engine")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(url)
        .await
        .context("Failed to connect to PostgreSQL")?;
    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;

    Ok(pool)
}

pub fn storage(pool: PgPool, hasher: CredentialHasher) -> Storage<PostgresBackend> {
    let pool = Arc::new(pool);
    Storage::new(
        PgUrlRepository::new(pool.clone()),
        PgUserRepository::new(pool.clone(), hasher),
        PgStatsRepository::new(pool),
    )
}
