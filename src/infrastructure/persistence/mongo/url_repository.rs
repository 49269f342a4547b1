//! MongoDB link store.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::{self, doc, oid::ObjectId};
use serde_json::json;
use std::time::Duration;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::debug;

use super::documents::UrlDocument;
use crate::domain::entities::ShortLink;
use crate::domain::repositories::UrlRepository;
use crate::domain::repositories::url_repository::{code_taken, link_not_found, target_id};
use crate::error::AppError;
use crate::utils::db_error::is_mongo_duplicate_key;

/// Extra attempts after a save loses the race for an id.
///
/// An insert only fails on a duplicate key when another writer's insert of
/// the same id succeeded, so this is the number of concurrent writers a save
/// tolerates.
const SAVE_RETRIES: usize = 256;

/// Upper bound of a single backoff delay before jitter.
const SAVE_MAX_DELAY: Duration = Duration::from_millis(50);

/// Links in the `url` collection.
///
/// A unique index on `shortid` makes the insert the arbiter: when two writers
/// read the same maximum, one insert fails with a duplicate key and that
/// writer backs off for a jittered, growing delay, re-reads the maximum and
/// tries again.
pub struct MongoUrlRepository {
    collection: Collection<UrlDocument>,
}

impl MongoUrlRepository {
    pub fn new(collection: Collection<UrlDocument>) -> Self {
        Self { collection }
    }

    async fn try_save(&self, long_url: &str, owner: &ObjectId) -> mongodb::error::Result<i64> {
        let max = self
            .collection
            .find_one(doc! {})
            .sort(doc! { "shortid": -1 })
            .await?
            .map(|d| d.short_id)
            .unwrap_or(0);
        let short_id = max + 1;

        let now = bson::DateTime::now();
        self.collection
            .insert_one(UrlDocument {
                id: ObjectId::new(),
                short_id,
                url: long_url.to_string(),
                user_id: *owner,
                created_at: now,
                updated_at: now,
            })
            .await?;

        Ok(short_id)
    }

    async fn exists(&self, id: i64) -> Result<bool, AppError> {
        let count = self
            .collection
            .count_documents(doc! { "shortid": id })
            .await?;
        Ok(count > 0)
    }
}

#[async_trait]
impl UrlRepository<ObjectId> for MongoUrlRepository {
    async fn save(&self, long_url: &str, owner: &ObjectId) -> Result<i64, AppError> {
        let strategy = ExponentialBackoff::from_millis(2)
            .max_delay(SAVE_MAX_DELAY)
            .map(jitter)
            .take(SAVE_RETRIES);

        RetryIf::start(
            strategy,
            || self.try_save(long_url, owner),
            |e: &mongodb::error::Error| {
                let retry = is_mongo_duplicate_key(e);
                if retry {
                    debug!("Link id taken concurrently, retrying");
                }
                retry
            },
        )
        .await
        .map_err(|e| {
            if is_mongo_duplicate_key(&e) {
                AppError::storage("Could not allocate a link id", json!({}))
            } else {
                e.into()
            }
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<ShortLink<ObjectId>, AppError> {
        self.collection
            .find_one(doc! { "shortid": id })
            .await?
            .map(Into::into)
            .ok_or_else(|| link_not_found(id))
    }

    async fn update(&self, id: i64, new_code: &str) -> Result<i64, AppError> {
        let new_id = target_id(new_code)?;

        if !self.exists(id).await? {
            return Err(link_not_found(id));
        }
        if new_id == id {
            return Ok(id);
        }
        if self.exists(new_id).await? {
            return Err(code_taken(new_code));
        }

        let result = self
            .collection
            .update_one(
                doc! { "shortid": id },
                doc! { "$set": { "shortid": new_id, "updatedat": bson::DateTime::now() } },
            )
            .await
            .map_err(|e| {
                if is_mongo_duplicate_key(&e) {
                    code_taken(new_code)
                } else {
                    e.into()
                }
            })?;

        if result.matched_count == 0 {
            return Err(link_not_found(id));
        }

        Ok(new_id)
    }

    async fn find_all_by_user(&self, owner: &ObjectId) -> Result<Vec<ShortLink<ObjectId>>, AppError> {
        let docs: Vec<UrlDocument> = self
            .collection
            .find(doc! { "userid": *owner })
            .await?
            .try_collect()
            .await?;

        Ok(docs.into_iter().map(Into::into).collect())
    }

    async fn find_all(&self) -> Result<Vec<ShortLink<ObjectId>>, AppError> {
        let docs: Vec<UrlDocument> = self
            .collection
            .find(doc! {})
            .sort(doc! { "shortid": 1 })
            .await?
            .try_collect()
            .await?;

        Ok(docs.into_iter().map(Into::into).collect())
    }
}
