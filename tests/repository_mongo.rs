//! Requires a MongoDB server: `MONGO_URI=... cargo test -- --ignored`.

use mongodb::bson::oid::ObjectId;
use std::collections::BTreeSet;
use std::sync::Arc;
use mongodb::{Client, Database};

use littleu::domain::entities::RequestHeaders;
use littleu::domain::repositories::{StatsRepository, UrlRepository, UserRepository};
use littleu::error::AppError;
use littleu::infrastructure::persistence::mongo;
use littleu::utils::password::{CredentialHasher, MIN_COST};

/// Fresh database per test, dropped by the caller.
async fn database() -> Database {
    let uri = std::env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".into());
    let client = Client::with_uri_str(&uri).await.unwrap();
    let db = client.database(&format!("littleu_test_{}", uuid::Uuid::new_v4().simple()));
    mongo::ensure_indexes(&db).await.unwrap();
    db
}

fn hasher() -> CredentialHasher {
    CredentialHasher::new(MIN_COST)
}

#[tokio::test]
#[ignore]
async fn test_users_links_and_stats() {
    let db = database().await;
    let storage = mongo::storage(&db, hasher());

    let bob = storage.users.add_user("bob", "secret123").await.unwrap();
    let duplicate = storage.users.add_user("bob", "other").await;
    assert!(matches!(duplicate, Err(AppError::Conflict { .. })));

    let first = storage.urls.save("https://example.com/1", &bob.id).await.unwrap();
    let second = storage.urls.save("https://example.com/2", &bob.id).await.unwrap();
    assert_eq!((first, second), (1, 2));

    let moved = storage.urls.update(first, "docs").await.unwrap();
    assert!(storage.urls.find_by_id(first).await.is_err());
    assert_eq!(storage.urls.find_by_id(moved).await.unwrap().owner, bob.id);

    let taken = storage.urls.update(moved, "c").await;
    assert!(matches!(taken, Err(AppError::Conflict { .. })));

    storage
        .stats
        .record_visit(moved, &RequestHeaders::new(), &bob.id)
        .await
        .unwrap();
    assert_eq!(storage.stats.find_by_short_id(moved).await.unwrap().len(), 1);
    assert_eq!(storage.stats.find_all_by_user(&bob.id).await.unwrap().len(), 1);
    assert!(
        storage
            .stats
            .find_all_by_user(&ObjectId::new())
            .await
            .unwrap()
            .is_empty()
    );

    assert_eq!(storage.stats.move_visits(moved, first).await.unwrap(), 1);
    assert_eq!(storage.stats.find_by_short_id(first).await.unwrap().len(), 1);
    assert!(storage.stats.find_by_short_id(moved).await.unwrap().is_empty());

    db.drop().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore]
async fn test_concurrent_saves_get_distinct_ids() {
    let db = database().await;
    let storage = mongo::storage(&db, hasher());
    let owner = ObjectId::new();
    let urls = storage.urls.clone();

    let handles: Vec<_> = (0..50)
        .map(|i| {
            let urls = Arc::clone(&urls);
            tokio::spawn(async move {
                urls.save(&format!("https://example.com/{}", i), &owner)
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut ids = BTreeSet::new();
    for handle in handles {
        ids.insert(handle.await.unwrap());
    }

    assert_eq!(ids, (1..=50).collect::<BTreeSet<i64>>());

    db.drop().await.unwrap();
}
