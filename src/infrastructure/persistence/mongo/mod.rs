//! MongoDB storage engine (`DB_ENGINE=mongo`).
//!
//! Collections: `url`, `user`, `stats` and `counters` in the configured
//! database (`littleu` by default). Unique indexes are created on connect.

mod documents;
mod stats_repository;
mod url_repository;
mod user_repository;

pub use stats_repository::MongoStatsRepository;
pub use url_repository::MongoUrlRepository;
pub use user_repository::MongoUserRepository;

use anyhow::{Context, Result};
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::IndexOptions;
use mongodb::{Client, Database, IndexModel};

use crate::config::Config;
use crate::domain::storage::{Storage, StorageBackend};
use crate::utils::password::CredentialHasher;
use documents::{
    COUNTER_COLLECTION, STATS_COLLECTION, URL_COLLECTION, USER_COLLECTION, UrlDocument,
    UserDocument, VisitDocument,
};

pub struct MongoBackend;

impl StorageBackend for MongoBackend {
    const ENGINE: &'static str = "mongo";

    type UserId = ObjectId;
    type Urls = MongoUrlRepository;
    type Users = MongoUserRepository;
    type Stats = MongoStatsRepository;
}

/// Connects to `MONGO_URI`, checks the server with a ping and makes sure
/// the unique indexes exist.
pub async fn connect(config: &Config) -> Result<Database> {
    let uri = config
        .mongo_uri
        .as_deref()
        .context("MONGO_URI must be set for the mongo engine")?;

    let client = Client::with_uri_str(uri)
        .await
        .context("Failed to create MongoDB client")?;
    let db = client.database(&config.mongo_database);

    db.run_command(doc! { "ping": 1 })
        .await
        .context("MongoDB ping failed")?;
    tracing::info!("Connected to MongoDB database {}", config.mongo_database);

    ensure_indexes(&db).await?;

    Ok(db)
}

/// Creates the unique and lookup indexes; a no-op when they already exist.
pub async fn ensure_indexes(db: &Database) -> Result<()> {
    let unique = || IndexOptions::builder().unique(true).build();

    db.collection::<UrlDocument>(URL_COLLECTION)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "shortid": 1 })
                .options(unique())
                .build(),
        )
        .await
        .context("Failed to create url.shortid index")?;

    db.collection::<UrlDocument>(URL_COLLECTION)
        .create_index(IndexModel::builder().keys(doc! { "userid": 1 }).build())
        .await
        .context("Failed to create url.userid index")?;

    db.collection::<UserDocument>(USER_COLLECTION)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "username": 1 })
                .options(unique())
                .build(),
        )
        .await
        .context("Failed to create user.username index")?;

    let stats = db.collection::<VisitDocument>(STATS_COLLECTION);
    stats
        .create_index(IndexModel::builder().keys(doc! { "shortid": 1 }).build())
        .await
        .context("Failed to create stats.shortid index")?;
    stats
        .create_index(IndexModel::builder().keys(doc! { "userid": 1 }).build())
        .await
        .context("Failed to create stats.userid index")?;

    Ok(())
}

pub fn storage(db: &Database, hasher: CredentialHasher) -> Storage<MongoBackend> {
    Storage::new(
        MongoUrlRepository::new(db.collection(URL_COLLECTION)),
        MongoUserRepository::new(db.collection(USER_COLLECTION), hasher),
        MongoStatsRepository::new(db.collection(STATS_COLLECTION), db.collection(COUNTER_COLLECTION)),
    )
}
