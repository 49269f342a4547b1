mod common;

use common::TestApp;
use littleu::api::dto::stats::StatsResponse;
use serde_json::json;

#[tokio::test]
async fn test_stats_requires_token() {
    let app = TestApp::new();

    assert_eq!(app.server.get("/api/stats").await.status_code(), 401);
    assert_eq!(app.server.get("/api/stats/b").await.status_code(), 401);
}

#[tokio::test]
async fn test_stats_empty() {
    let app = TestApp::new();
    let tokens = app.register("bob", "secret123").await;

    let response = app
        .server
        .get("/api/stats")
        .authorization_bearer(&tokens.access_token)
        .await;

    assert_eq!(response.status_code(), 200);
    let stats: StatsResponse = response.json();
    assert_eq!(stats.total, 0);
    assert!(stats.code.is_none());
}

#[tokio::test]
async fn test_stats_for_user_and_link() {
    let app = TestApp::new();
    let tokens = app.register("bob", "secret123").await;
    app.shorten(&tokens.access_token, "https://example.com/1").await;
    app.shorten(&tokens.access_token, "https://example.com/2").await;

    app.server.get("/b").await;
    app.server.get("/c").await;
    app.server.get("/c").await;
    app.wait_for_visits(common::user_id(&tokens), 3).await;

    let all: StatsResponse = app
        .server
        .get("/api/stats")
        .authorization_bearer(&tokens.access_token)
        .await
        .json();
    assert_eq!(all.total, 3);

    let one: StatsResponse = app
        .server
        .get("/api/stats/c")
        .authorization_bearer(&tokens.access_token)
        .await
        .json();
    assert_eq!(one.code.as_deref(), Some("c"));
    assert_eq!(one.total, 2);
    assert!(one.items.iter().all(|v| v.code == "c"));
}

#[tokio::test]
async fn test_link_stats_of_other_user() {
    let app = TestApp::new();
    let bob = app.register("bob", "secret123").await;
    let eve = app.register("eve", "secret456").await;
    app.shorten(&bob.access_token, "https://example.com/1").await;

    let response = app
        .server
        .get("/api/stats/b")
        .authorization_bearer(&eve.access_token)
        .await;
    assert_eq!(response.status_code(), 404);

    let unknown = app
        .server
        .get("/api/stats/zzz")
        .authorization_bearer(&bob.access_token)
        .await;
    assert_eq!(unknown.status_code(), 404);
}

#[tokio::test]
async fn test_stats_move_with_renamed_link() {
    let app = TestApp::new();
    let bob = app.register("bob", "secret123").await;
    let eve = app.register("eve", "secret456").await;
    app.shorten(&bob.access_token, "https://example.com/1").await;

    app.server.get("/b").await;
    app.server.get("/b").await;
    app.wait_for_visits(common::user_id(&bob), 2).await;

    let renamed = app
        .server
        .patch("/api/links/b")
        .authorization_bearer(&bob.access_token)
        .json(&json!({ "code": "docs" }))
        .await;
    assert_eq!(renamed.status_code(), 200);

    let moved: StatsResponse = app
        .server
        .get("/api/stats/docs")
        .authorization_bearer(&bob.access_token)
        .await
        .json();
    assert_eq!(moved.total, 2);
    assert!(moved.items.iter().all(|v| v.code == "docs"));

    let link = app.shorten(&eve.access_token, "https://example.org/").await;
    let taken = app
        .server
        .patch(&format!("/api/links/{}", link.code))
        .authorization_bearer(&eve.access_token)
        .json(&json!({ "code": "b" }))
        .await;
    assert_eq!(taken.status_code(), 200);

    let fresh: StatsResponse = app
        .server
        .get("/api/stats/b")
        .authorization_bearer(&eve.access_token)
        .await
        .json();
    assert_eq!(fresh.total, 0);
}
