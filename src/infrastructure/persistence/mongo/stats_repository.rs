//! MongoDB visit log.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::{self, doc, oid::ObjectId};
use mongodb::options::ReturnDocument;
use serde_json::json;

use super::documents::{CounterDocument, VisitDocument};
use crate::domain::entities::{RequestHeaders, VisitStat};
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;

const VISIT_SEQUENCE: &str = "visits";

/// Visits in the `stats` collection, numbered by an atomic `$inc` on a
/// counter document.
pub struct MongoStatsRepository {
    collection: Collection<VisitDocument>,
    counters: Collection<CounterDocument>,
}

impl MongoStatsRepository {
    pub fn new(collection: Collection<VisitDocument>, counters: Collection<CounterDocument>) -> Self {
        Self {
            collection,
            counters,
        }
    }

    async fn next_id(&self) -> Result<i64, AppError> {
        let counter = self
            .counters
            .find_one_and_update(
                doc! { "_id": VISIT_SEQUENCE },
                doc! { "$inc": { "seq": 1_i64 } },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?;

        counter
            .map(|c| c.seq)
            .ok_or_else(|| AppError::storage("Visit counter unavailable", json!({})))
    }
}

#[async_trait]
impl StatsRepository<ObjectId> for MongoStatsRepository {
    async fn record_visit(
        &self,
        short_link_id: i64,
        headers: &RequestHeaders,
        owner: &ObjectId,
    ) -> Result<i64, AppError> {
        let id = self.next_id().await?;

        self.collection
            .insert_one(VisitDocument {
                id,
                short_id: short_link_id,
                user_id: *owner,
                timestamp: bson::DateTime::now(),
                headers: headers.clone(),
            })
            .await?;

        Ok(id)
    }

    async fn find_by_short_id(&self, short_link_id: i64) -> Result<Vec<VisitStat<ObjectId>>, AppError> {
        let docs: Vec<VisitDocument> = self
            .collection
            .find(doc! { "shortid": short_link_id })
            .sort(doc! { "_id": 1 })
            .await?
            .try_collect()
            .await?;

        Ok(docs.into_iter().map(Into::into).collect())
    }

    async fn move_visits(&self, from: i64, to: i64) -> Result<u64, AppError> {
        let result = self
            .collection
            .update_many(doc! { "shortid": from }, doc! { "$set": { "shortid": to } })
            .await?;

        Ok(result.modified_count)
    }

    async fn find_all_by_user(&self, owner: &ObjectId) -> Result<Vec<VisitStat<ObjectId>>, AppError> {
        let docs: Vec<VisitDocument> = self
            .collection
            .find(doc! { "userid": *owner })
            .sort(doc! { "_id": 1 })
            .await?
            .try_collect()
            .await?;

        Ok(docs.into_iter().map(Into::into).collect())
    }
}
