mod common;

use common::TestApp;
use std::time::Duration;

use littleu::domain::repositories::StatsRepository;

#[tokio::test]
async fn test_redirect_success() {
    let app = TestApp::new();
    let tokens = app.register("bob", "secret123").await;
    app.shorten(&tokens.access_token, "https://example.com/target")
        .await;

    let response = app.server.get("/b").await;

    assert_eq!(response.status_code(), 307);
    assert_eq!(response.header("location"), "https://example.com/target");
}

#[tokio::test]
async fn test_redirect_not_found() {
    let app = TestApp::new();

    for path in ["/b", "/zz9", "/ab", "/not-a-code"] {
        let response = app.server.get(path).await;
        assert_eq!(response.status_code(), 404, "{}", path);
    }
}

#[tokio::test]
async fn test_redirect_records_visit_headers() {
    let app = TestApp::new();
    let tokens = app.register("bob", "secret123").await;
    app.shorten(&tokens.access_token, "https://example.com/target")
        .await;

    app.server
        .get("/b")
        .add_header("User-Agent", "Mozilla/5.0")
        .add_header("Referer", "https://news.example/")
        .await;

    let visits = app.wait_for_visits(common::user_id(&tokens), 1).await;

    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].short_link_id, 1);
    assert_eq!(visits[0].request_headers["user-agent"], vec!["Mozilla/5.0"]);
    assert_eq!(
        visits[0].request_headers["referer"],
        vec!["https://news.example/"]
    );
}

#[tokio::test]
async fn test_redirect_without_stats() {
    let app = TestApp::without_stats();
    let tokens = app.register("bob", "secret123").await;
    app.shorten(&tokens.access_token, "https://example.com/target")
        .await;

    let response = app.server.get("/b").await;
    assert_eq!(response.status_code(), 307);

    tokio::time::sleep(Duration::from_millis(50)).await;
    let visits = app
        .storage
        .stats
        .find_all_by_user(&common::user_id(&tokens))
        .await
        .unwrap();
    assert!(visits.is_empty());
}
