#![allow(dead_code)]

use axum_test::TestServer;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use littleu::api::dto::auth::TokenResponse;
use littleu::api::dto::links::LinkResponse;
use littleu::application::services::{AuthService, StatsService, TokenConfig};
use littleu::domain::entities::VisitStat;
use littleu::domain::repositories::StatsRepository;
use littleu::domain::storage::Storage;
use littleu::domain::visit_worker::run_visit_worker;
use littleu::infrastructure::persistence::memory::{self, MemoryBackend};
use littleu::infrastructure::session::MemorySessionStore;
use littleu::routes::router;
use littleu::state::AppState;
use littleu::utils::password::{CredentialHasher, MIN_COST};

pub const BASE_URL: &str = "http://s.test";
pub const ACCESS_SECRET: &str = "test-access-secret";
pub const REFRESH_SECRET: &str = "test-refresh-secret";

pub fn token_config() -> TokenConfig {
    TokenConfig {
        access_secret: ACCESS_SECRET.to_string(),
        refresh_secret: REFRESH_SECRET.to_string(),
        access_ttl: Duration::from_secs(15 * 60),
        refresh_ttl: Duration::from_secs(7 * 24 * 60 * 60),
    }
}

pub fn hasher() -> CredentialHasher {
    CredentialHasher::new(MIN_COST)
}

/// In-memory engine behind the full router.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Storage<MemoryBackend>,
    pub stats_service: Arc<StatsService<MemoryBackend>>,
}

impl TestApp {
    /// Visit recording enabled, with a running worker.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(100);
        let app = Self::with_sender(memory::storage(hasher()), Some(tx));
        tokio::spawn(run_visit_worker(rx, app.stats_service.clone()));
        app
    }

    pub fn without_stats() -> Self {
        Self::with_sender(memory::storage(hasher()), None)
    }

    fn with_sender(
        storage: Storage<MemoryBackend>,
        visit_sender: Option<littleu::state::VisitSender<MemoryBackend>>,
    ) -> Self {
        let auth = Arc::new(AuthService::new(
            Arc::new(MemorySessionStore::new()),
            token_config(),
        ));
        let state = AppState::new(&storage, auth, visit_sender, BASE_URL);
        let stats_service = state.stats_service.clone();
        let server = TestServer::new(router(state)).unwrap();

        Self {
            server,
            storage,
            stats_service,
        }
    }

    pub async fn register(&self, username: &str, password: &str) -> TokenResponse {
        let response = self
            .server
            .post("/auth/register")
            .json(&json!({ "username": username, "password": password }))
            .await;
        assert_eq!(response.status_code(), 201);
        response.json()
    }

    pub async fn shorten(&self, access_token: &str, url: &str) -> LinkResponse {
        let response = self
            .server
            .post("/api/shorten")
            .authorization_bearer(access_token)
            .json(&json!({ "url": url }))
            .await;
        assert_eq!(response.status_code(), 201);
        response.json()
    }

    /// Waits for the background worker to store at least `count` visits of `owner`.
    pub async fn wait_for_visits(&self, owner: u64, count: usize) -> Vec<VisitStat<u64>> {
        for _ in 0..100 {
            let visits = self.storage.stats.find_all_by_user(&owner).await.unwrap();
            if visits.len() >= count {
                return visits;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {} visits for user {}", count, owner);
    }
}

pub fn user_id(tokens: &TokenResponse) -> u64 {
    tokens.user_id.parse().unwrap()
}
