//! In-process link store.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::domain::entities::ShortLink;
use crate::domain::repositories::UrlRepository;
use crate::domain::repositories::url_repository::{code_taken, link_not_found, target_id};
use crate::error::AppError;

/// Links kept in an ordered map guarded by one lock.
///
/// Allocation and renumbering take the write lock for the whole
/// read-modify-write; lookups share the read lock.
#[derive(Default)]
pub struct MemoryUrlRepository {
    links: RwLock<BTreeMap<i64, ShortLink<u64>>>,
}

impl MemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UrlRepository<u64> for MemoryUrlRepository {
    async fn save(&self, long_url: &str, owner: &u64) -> Result<i64, AppError> {
        let mut links = self.links.write().await;

        let max = links.last_key_value().map(|(id, _)| *id).unwrap_or(0);
        let id = max
            .checked_add(1)
            .ok_or_else(|| AppError::storage("Link id space exhausted", json!({})))?;

        let now = Utc::now();
        links.insert(
            id,
            ShortLink::new(id, long_url.to_string(), *owner, now, now),
        );

        Ok(id)
    }

    async fn find_by_id(&self, id: i64) -> Result<ShortLink<u64>, AppError> {
        self.links
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| link_not_found(id))
    }

    async fn update(&self, id: i64, new_code: &str) -> Result<i64, AppError> {
        let new_id = target_id(new_code)?;
        let mut links = self.links.write().await;

        if !links.contains_key(&id) {
            return Err(link_not_found(id));
        }
        if new_id == id {
            return Ok(id);
        }
        if links.contains_key(&new_id) {
            return Err(code_taken(new_code));
        }

        let Some(mut link) = links.remove(&id) else {
            return Err(link_not_found(id));
        };
        link.id = new_id;
        link.updated_at = Utc::now();
        links.insert(new_id, link);

        Ok(new_id)
    }

    async fn find_all_by_user(&self, owner: &u64) -> Result<Vec<ShortLink<u64>>, AppError> {
        Ok(self
            .links
            .read()
            .await
            .values()
            .filter(|link| link.owner == *owner)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<ShortLink<u64>>, AppError> {
        Ok(self.links.read().await.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_allocates_sequential_ids() {
        let repo = MemoryUrlRepository::new();

        assert_eq!(repo.save("https://a.example/", &1).await.unwrap(), 1);
        assert_eq!(repo.save("https://b.example/", &1).await.unwrap(), 2);
        assert_eq!(repo.save("https://c.example/", &2).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_find_by_id_not_found() {
        let repo = MemoryUrlRepository::new();

        let result = repo.find_by_id(42).await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_renumbers_link() {
        let repo = MemoryUrlRepository::new();
        repo.save("https://a.example/", &1).await.unwrap();

        let new_id = repo.update(1, "ba").await.unwrap();
        assert_eq!(new_id, 62);

        let link = repo.find_by_id(62).await.unwrap();
        assert_eq!(link.long_url, "https://a.example/");
        assert!(matches!(
            repo.find_by_id(1).await,
            Err(AppError::NotFound { .. })
        ));

        // Allocation continues after the highest id.
        assert_eq!(repo.save("https://b.example/", &1).await.unwrap(), 63);
    }

    #[tokio::test]
    async fn test_update_to_own_code_is_noop() {
        let repo = MemoryUrlRepository::new();
        repo.save("https://a.example/", &1).await.unwrap();

        assert_eq!(repo.update(1, "b").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_rejects_taken_id() {
        let repo = MemoryUrlRepository::new();
        repo.save("https://a.example/", &1).await.unwrap();
        repo.save("https://b.example/", &1).await.unwrap();

        let result = repo.update(1, "c").await;
        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_code() {
        let repo = MemoryUrlRepository::new();
        repo.save("https://a.example/", &1).await.unwrap();

        assert!(matches!(
            repo.update(1, "a").await,
            Err(AppError::Validation { .. })
        ));
        assert!(matches!(
            repo.update(1, "no-dash").await,
            Err(AppError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_missing_link() {
        let repo = MemoryUrlRepository::new();

        let result = repo.update(5, "b").await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_find_all_by_user_filters_owner() {
        let repo = MemoryUrlRepository::new();
        repo.save("https://a.example/", &1).await.unwrap();
        repo.save("https://b.example/", &2).await.unwrap();
        repo.save("https://c.example/", &1).await.unwrap();

        let mine = repo.find_all_by_user(&1).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|l| l.owner == 1));

        assert_eq!(repo.find_all().await.unwrap().len(), 3);
    }
}
