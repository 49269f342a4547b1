//! Shared state injected into every handler.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{AuthService, LinkService, StatsService, UserService};
use crate::domain::storage::{Storage, StorageBackend};
use crate::domain::visit_event::VisitEvent;

pub type VisitSender<B> = mpsc::Sender<VisitEvent<<B as StorageBackend>::UserId>>;

pub struct AppState<B: StorageBackend> {
    pub link_service: Arc<LinkService<B>>,
    pub user_service: Arc<UserService<B>>,
    pub stats_service: Arc<StatsService<B>>,
    pub auth_service: Arc<AuthService>,
    /// `None` when visit recording is disabled.
    pub visit_sender: Option<VisitSender<B>>,
    pub base_url: Arc<str>,
}

impl<B: StorageBackend> AppState<B> {
    pub fn new(
        storage: &Storage<B>,
        auth_service: Arc<AuthService>,
        visit_sender: Option<VisitSender<B>>,
        base_url: &str,
    ) -> Self {
        Self {
            link_service: Arc::new(LinkService::new(storage)),
            user_service: Arc::new(UserService::new(storage)),
            stats_service: Arc::new(StatsService::new(storage)),
            auth_service,
            visit_sender,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }

    /// Absolute short URL of `code`.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }
}

impl<B: StorageBackend> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            link_service: self.link_service.clone(),
            user_service: self.user_service.clone(),
            stats_service: self.stats_service.clone(),
            auth_service: self.auth_service.clone(),
            visit_sender: self.visit_sender.clone(),
            base_url: self.base_url.clone(),
        }
    }
}
