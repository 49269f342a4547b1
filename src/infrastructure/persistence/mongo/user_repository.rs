//! MongoDB user store.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::{self, doc, oid::ObjectId};

use super::documents::UserDocument;
use crate::domain::entities::User;
use crate::domain::repositories::UserRepository;
use crate::domain::repositories::user_repository::{user_not_found, username_taken};
use crate::error::AppError;
use crate::utils::db_error::is_mongo_duplicate_key;
use crate::utils::password::CredentialHasher;

/// Accounts in the `user` collection; `username` carries a unique index.
pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
    hasher: CredentialHasher,
}

impl MongoUserRepository {
    pub fn new(collection: Collection<UserDocument>, hasher: CredentialHasher) -> Self {
        Self { collection, hasher }
    }
}

#[async_trait]
impl UserRepository<ObjectId> for MongoUserRepository {
    fn hasher(&self) -> &CredentialHasher {
        &self.hasher
    }

    async fn add_user(&self, username: &str, password: &str) -> Result<User<ObjectId>, AppError> {
        let password_hash = self.hasher.hash_async(password).await?;
        let now = bson::DateTime::now();

        let document = UserDocument {
            id: ObjectId::new(),
            username: username.to_string(),
            password: password_hash,
            created_at: now,
            updated_at: now,
        };

        self.collection.insert_one(&document).await.map_err(|e| {
            if is_mongo_duplicate_key(&e) {
                username_taken(username)
            } else {
                e.into()
            }
        })?;

        Ok(document.into())
    }

    async fn user_exists(&self, username: &str) -> Result<bool, AppError> {
        let count = self
            .collection
            .count_documents(doc! { "username": username })
            .await?;
        Ok(count > 0)
    }

    async fn find_by_username(&self, username: &str) -> Result<User<ObjectId>, AppError> {
        self.collection
            .find_one(doc! { "username": username })
            .await?
            .map(Into::into)
            .ok_or_else(|| user_not_found(username))
    }

    async fn find_all(&self) -> Result<Vec<User<ObjectId>>, AppError> {
        let docs: Vec<UserDocument> = self.collection.find(doc! {}).await?.try_collect().await?;
        Ok(docs.into_iter().map(Into::into).collect())
    }
}
