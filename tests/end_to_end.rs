mod common;

use common::TestApp;
use littleu::api::dto::auth::TokenResponse;
use littleu::api::dto::stats::StatsResponse;
use serde_json::json;

#[tokio::test]
async fn test_register_login_shorten_resolve_stats() {
    let app = TestApp::new();
    app.register("bob", "secret123").await;

    let login: TokenResponse = app
        .server
        .post("/auth/login")
        .json(&json!({ "username": "bob", "password": "secret123" }))
        .await
        .json();

    let link = app
        .shorten(&login.access_token, "https://example.com/page")
        .await;
    assert_eq!(link.code, "b");

    let stats: StatsResponse = app
        .server
        .get("/api/stats")
        .authorization_bearer(&login.access_token)
        .await
        .json();
    assert_eq!(stats.total, 0);

    let redirect = app.server.get("/b").await;
    assert_eq!(redirect.status_code(), 307);
    assert_eq!(redirect.header("location"), "https://example.com/page");

    app.wait_for_visits(common::user_id(&login), 1).await;

    let stats: StatsResponse = app
        .server
        .get("/api/stats")
        .authorization_bearer(&login.access_token)
        .await
        .json();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.items[0].code, "b");

    let logout = app
        .server
        .post("/auth/logout")
        .authorization_bearer(&login.access_token)
        .await;
    assert_eq!(logout.status_code(), 204);

    let after = app
        .server
        .get("/api/stats")
        .authorization_bearer(&login.access_token)
        .await;
    assert_eq!(after.status_code(), 401);
}
