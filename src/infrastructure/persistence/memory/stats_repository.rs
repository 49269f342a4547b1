//! In-process visit log.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::entities::{RequestHeaders, VisitStat};
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;

#[derive(Default)]
pub struct MemoryStatsRepository {
    visits: RwLock<Vec<VisitStat<u64>>>,
}

impl MemoryStatsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatsRepository<u64> for MemoryStatsRepository {
    async fn record_visit(
        &self,
        short_link_id: i64,
        headers: &RequestHeaders,
        owner: &u64,
    ) -> Result<i64, AppError> {
        let mut visits = self.visits.write().await;
        let id = visits.len() as i64 + 1;

        visits.push(VisitStat {
            id,
            short_link_id,
            owner: *owner,
            timestamp: Utc::now(),
            request_headers: headers.clone(),
        });

        Ok(id)
    }

    async fn find_by_short_id(&self, short_link_id: i64) -> Result<Vec<VisitStat<u64>>, AppError> {
        Ok(self
            .visits
            .read()
            .await
            .iter()
            .filter(|v| v.short_link_id == short_link_id)
            .cloned()
            .collect())
    }

    async fn move_visits(&self, from: i64, to: i64) -> Result<u64, AppError> {
        let mut visits = self.visits.write().await;
        let mut moved = 0;
        for visit in visits.iter_mut().filter(|v| v.short_link_id == from) {
            visit.short_link_id = to;
            moved += 1;
        }
        Ok(moved)
    }

    async fn find_all_by_user(&self, owner: &u64) -> Result<Vec<VisitStat<u64>>, AppError> {
        Ok(self
            .visits
            .read()
            .await
            .iter()
            .filter(|v| v.owner == *owner)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_record_and_query() {
        let repo = MemoryStatsRepository::new();
        let mut headers = RequestHeaders::new();
        headers.insert("user-agent".to_string(), vec!["curl/8.0".to_string()]);

        assert_eq!(repo.record_visit(1, &headers, &10).await.unwrap(), 1);
        assert_eq!(repo.record_visit(2, &headers, &10).await.unwrap(), 2);
        assert_eq!(repo.record_visit(1, &RequestHeaders::new(), &20).await.unwrap(), 3);

        let by_link = repo.find_by_short_id(1).await.unwrap();
        assert_eq!(by_link.len(), 2);

        let by_user = repo.find_all_by_user(&10).await.unwrap();
        assert_eq!(by_user.len(), 2);
        assert_eq!(by_user[0].request_headers["user-agent"], vec!["curl/8.0"]);

        assert!(repo.find_all_by_user(&99).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_move_visits() {
        let repo = MemoryStatsRepository::new();
        repo.record_visit(1, &RequestHeaders::new(), &10).await.unwrap();
        repo.record_visit(1, &RequestHeaders::new(), &10).await.unwrap();
        repo.record_visit(2, &RequestHeaders::new(), &10).await.unwrap();

        assert_eq!(repo.move_visits(1, 62).await.unwrap(), 2);

        assert!(repo.find_by_short_id(1).await.unwrap().is_empty());
        assert_eq!(repo.find_by_short_id(62).await.unwrap().len(), 2);
        assert_eq!(repo.find_by_short_id(2).await.unwrap().len(), 1);
        assert_eq!(repo.move_visits(1, 5).await.unwrap(), 0);
    }
}
