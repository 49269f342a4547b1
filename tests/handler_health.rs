mod common;

use common::TestApp;
use littleu::api::dto::health::HealthResponse;

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let response = app.server.get("/health").await;

    assert_eq!(response.status_code(), 200);
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.engine, "memory");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(health.checks.session_store.status, "ok");
    assert_eq!(health.checks.visit_queue.status, "ok");
}

#[tokio::test]
async fn test_health_check_with_stats_disabled() {
    let app = TestApp::without_stats();

    let response = app.server.get("/health").await;

    assert_eq!(response.status_code(), 200);
    let health: HealthResponse = response.json();
    assert_eq!(
        health.checks.visit_queue.message.as_deref(),
        Some("Visit recording disabled")
    );
}
