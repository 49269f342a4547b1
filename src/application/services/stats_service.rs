//! Visit recording and statistics queries.

use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::{RequestHeaders, VisitStat};
use crate::domain::repositories::{StatsRepository, UrlRepository};
use crate::domain::storage::{Storage, StorageBackend};
use crate::error::AppError;
use crate::utils::codec::try_decode;

type Visit<B> = VisitStat<<B as StorageBackend>::UserId>;

pub struct StatsService<B: StorageBackend> {
    stats: Arc<B::Stats>,
    urls: Arc<B::Urls>,
}

impl<B: StorageBackend> StatsService<B> {
    pub fn new(storage: &Storage<B>) -> Self {
        Self {
            stats: storage.stats.clone(),
            urls: storage.urls.clone(),
        }
    }

    /// Stores a visit of the link at `code`, owned by `owner`.
    ///
    /// Called by the visit worker; the redirect itself never waits on it.
    ///
    /// # Errors
    ///
    /// [`AppError::Validation`] if `code` is not a canonical short code.
    pub async fn record_visit(
        &self,
        code: &str,
        headers: &RequestHeaders,
        owner: &B::UserId,
    ) -> Result<i64, AppError> {
        let id = try_decode(code).ok_or_else(|| {
            AppError::bad_request("Invalid short code", json!({ "code": code }))
        })?;
        self.stats.record_visit(id, headers, owner).await
    }

    /// Visits across every link of `owner`.
    pub async fn list_for_user(&self, owner: &B::UserId) -> Result<Vec<Visit<B>>, AppError> {
        self.stats.find_all_by_user(owner).await
    }

    /// Visits of one link. Links of other users are reported as not found,
    /// and only visits recorded for `owner` are returned.
    pub async fn list_for_link(
        &self,
        code: &str,
        owner: &B::UserId,
    ) -> Result<Vec<Visit<B>>, AppError> {
        let not_found = || AppError::not_found("Short link not found", json!({ "code": code }));

        let id = try_decode(code).ok_or_else(not_found)?;
        let link = self.urls.find_by_id(id).await.map_err(|e| match e {
            AppError::NotFound { .. } => not_found(),
            other => other,
        })?;
        if link.owner != *owner {
            return Err(not_found());
        }

        let mut visits = self.stats.find_by_short_id(id).await?;
        visits.retain(|visit| visit.owner == *owner);
        Ok(visits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::memory::{self, MemoryBackend};
    use crate::utils::password::{CredentialHasher, MIN_COST};

    async fn setup() -> (Storage<MemoryBackend>, StatsService<MemoryBackend>) {
        let storage = memory::storage(CredentialHasher::new(MIN_COST));
        storage.urls.save("https://example.com/", &1).await.unwrap();
        let service = StatsService::new(&storage);
        (storage, service)
    }

    #[tokio::test]
    async fn test_record_and_list() {
        let (_storage, service) = setup().await;
        assert!(service.list_for_user(&1).await.unwrap().is_empty());

        let mut headers = RequestHeaders::new();
        headers.insert("referer".to_string(), vec!["https://news.example/".to_string()]);
        service.record_visit("b", &headers, &1).await.unwrap();

        let visits = service.list_for_user(&1).await.unwrap();
        assert_eq!(visits.len(), 1);
        assert_eq!(visits[0].short_link_id, 1);
        assert_eq!(visits[0].request_headers, headers);

        assert_eq!(service.list_for_link("b", &1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_for_link_of_other_user() {
        let (_storage, service) = setup().await;

        let result = service.list_for_link("b", &2).await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));

        let result = service.list_for_link("zz", &1).await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_for_link_skips_visits_of_other_owners() {
        let (storage, service) = setup().await;
        storage
            .stats
            .record_visit(1, &RequestHeaders::new(), &2)
            .await
            .unwrap();
        service.record_visit("b", &RequestHeaders::new(), &1).await.unwrap();

        let visits = service.list_for_link("b", &1).await.unwrap();
        assert_eq!(visits.len(), 1);
        assert_eq!(visits[0].owner, 1);
    }

    #[tokio::test]
    async fn test_record_visit_invalid_code() {
        let (_storage, service) = setup().await;

        let result = service.record_visit("a", &RequestHeaders::new(), &1).await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
        assert!(service.list_for_user(&1).await.unwrap().is_empty());
    }
}
