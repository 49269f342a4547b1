//! Storage engine selection.
//!
//! An [`EngineRegistry`] maps `DB_ENGINE` names to constructors. Each
//! constructor connects its backend and returns it behind the object-safe
//! [`Engine`] interface, so the server and the admin CLI never name a
//! concrete backend.

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::normalize_path::NormalizePath;

use crate::application::services::{AuthService, LinkService, UserService};
use crate::config::Config;
use crate::domain::storage::{Storage, StorageBackend};
use crate::domain::visit_worker::run_visit_worker;
use crate::error::AppError;
use crate::infrastructure::persistence::memory::{self, MemoryBackend};
use crate::infrastructure::persistence::mongo::{self, MongoBackend};
use crate::infrastructure::persistence::postgres::{self, PostgresBackend};
use crate::routes::app_router;
use crate::state::AppState;

/// Account as listed by the admin CLI.
#[derive(Debug, Clone)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Link as listed by the admin CLI.
#[derive(Debug, Clone)]
pub struct LinkSummary {
    pub id: i64,
    pub code: String,
    pub long_url: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
}

/// A connected storage engine with its backend type erased.
#[async_trait]
pub trait Engine: Send + Sync {
    fn name(&self) -> &'static str;

    /// Builds the HTTP application on this engine's stores.
    ///
    /// Spawns the visit worker when `config.stats_enabled` is set, so it must
    /// be called inside a Tokio runtime.
    fn app(&self, auth: Arc<AuthService>, config: &Config) -> NormalizePath<Router>;

    async fn users(&self) -> Result<Vec<UserSummary>, AppError>;

    async fn add_user(&self, username: &str, password: &str) -> Result<UserSummary, AppError>;

    async fn links(&self) -> Result<Vec<LinkSummary>, AppError>;
}

/// [`Engine`] over the stores of one [`StorageBackend`].
pub struct BackendEngine<B: StorageBackend> {
    storage: Storage<B>,
}

impl<B: StorageBackend> BackendEngine<B> {
    pub fn new(storage: Storage<B>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Storage<B> {
        &self.storage
    }

    /// Application state with a running visit worker when stats are enabled.
    pub fn state(&self, auth: Arc<AuthService>, config: &Config) -> AppState<B> {
        if !config.stats_enabled {
            return AppState::new(&self.storage, auth, None, &config.base_url);
        }

        let (tx, rx) = mpsc::channel(config.visit_queue_capacity);
        let state = AppState::new(&self.storage, auth, Some(tx), &config.base_url);
        tokio::spawn(run_visit_worker(rx, state.stats_service.clone()));
        tracing::info!("Visit worker started");
        state
    }
}

#[async_trait]
impl<B: StorageBackend> Engine for BackendEngine<B> {
    fn name(&self) -> &'static str {
        B::ENGINE
    }

    fn app(&self, auth: Arc<AuthService>, config: &Config) -> NormalizePath<Router> {
        app_router(self.state(auth, config))
    }

    async fn users(&self) -> Result<Vec<UserSummary>, AppError> {
        let mut users: Vec<UserSummary> = UserService::new(&self.storage)
            .list_users()
            .await?
            .into_iter()
            .map(|u| UserSummary {
                id: u.id.to_string(),
                username: u.username,
                created_at: u.created_at,
            })
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn add_user(&self, username: &str, password: &str) -> Result<UserSummary, AppError> {
        let user = UserService::new(&self.storage)
            .register(username, password)
            .await?;
        Ok(UserSummary {
            id: user.id.to_string(),
            username: user.username,
            created_at: user.created_at,
        })
    }

    async fn links(&self) -> Result<Vec<LinkSummary>, AppError> {
        let mut links: Vec<LinkSummary> = LinkService::new(&self.storage)
            .list_all()
            .await?
            .into_iter()
            .map(|l| LinkSummary {
                id: l.id,
                code: l.code(),
                long_url: l.long_url,
                owner: l.owner.to_string(),
                created_at: l.created_at,
            })
            .collect();
        links.sort_by_key(|l| l.id);
        Ok(links)
    }
}

pub type EngineFuture<'a> = BoxFuture<'a, anyhow::Result<Box<dyn Engine>>>;

/// Connects an engine from the configuration.
pub type EngineConstructor = for<'a> fn(&'a Config) -> EngineFuture<'a>;

pub struct EngineRegistry {
    constructors: BTreeMap<&'static str, EngineConstructor>,
}

impl EngineRegistry {
    /// A registry without any engine.
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Adds or replaces the constructor for `name`.
    pub fn register(&mut self, name: &'static str, constructor: EngineConstructor) {
        self.constructors.insert(name, constructor);
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.constructors.keys().copied().collect()
    }

    /// Connects the engine registered as `name`.
    ///
    /// # Errors
    ///
    /// Fails for unknown names and when the engine cannot connect.
    pub async fn open(&self, name: &str, config: &Config) -> anyhow::Result<Box<dyn Engine>> {
        let constructor = self.constructors.get(name).with_context(|| {
            format!(
                "Unknown DB_ENGINE '{}', expected one of: {}",
                name,
                self.names().join(", ")
            )
        })?;

        let engine = constructor(config).await?;
        tracing::info!("Storage engine: {}", engine.name());
        Ok(engine)
    }
}

impl Default for EngineRegistry {
    /// `memory`, `mongo` and `postgresql`.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(MemoryBackend::ENGINE, open_memory);
        registry.register(MongoBackend::ENGINE, open_mongo);
        registry.register(PostgresBackend::ENGINE, open_postgres);
        registry
    }
}

fn open_memory(config: &Config) -> EngineFuture<'_> {
    let storage = memory::storage(config.hasher());
    Box::pin(async move { Ok(Box::new(BackendEngine::new(storage)) as Box<dyn Engine>) })
}

fn open_mongo(config: &Config) -> EngineFuture<'_> {
    Box::pin(async move {
        let db = mongo::connect(config).await?;
        let storage = mongo::storage(&db, config.hasher());
        Ok(Box::new(BackendEngine::new(storage)) as Box<dyn Engine>)
    })
}

fn open_postgres(config: &Config) -> EngineFuture<'_> {
    Box::pin(async move {
        let pool = postgres::connect(config).await?;
        let storage = postgres::storage(pool, config.hasher());
        Ok(Box::new(BackendEngine::new(storage)) as Box<dyn Engine>)
    })
}
