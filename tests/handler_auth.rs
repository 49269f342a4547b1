mod common;

use common::TestApp;
use jsonwebtoken::{EncodingKey, Header, encode};
use littleu::api::dto::auth::TokenResponse;
use littleu::application::services::auth_service::AccessClaims;
use serde_json::{Value, json};

#[tokio::test]
async fn test_register_returns_tokens() {
    let app = TestApp::new();

    let tokens = app.register("bob", "secret123").await;

    assert_eq!(tokens.token_type, "Bearer");
    assert!(!tokens.access_token.is_empty());
    assert!(!tokens.refresh_token.is_empty());
    assert_ne!(tokens.access_token, tokens.refresh_token);
    assert!(tokens.refresh_expires_at > tokens.access_expires_at);
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = TestApp::new();
    app.register("bob", "secret123").await;

    let response = app
        .server
        .post("/auth/register")
        .json(&json!({ "username": "bob", "password": "other" }))
        .await;

    assert_eq!(response.status_code(), 409);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "conflict");
}

#[tokio::test]
async fn test_register_blank_fields() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/auth/register")
        .json(&json!({ "username": "  ", "password": "secret123" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_register_password_over_72_bytes() {
    let app = TestApp::new();

    // 40 characters, 80 bytes.
    let response = app
        .server
        .post("/auth/register")
        .json(&json!({ "username": "bob", "password": "é".repeat(40) }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_login() {
    let app = TestApp::new();
    let registered = app.register("bob", "secret123").await;

    let response = app
        .server
        .post("/auth/login")
        .json(&json!({ "username": "bob", "password": "secret123" }))
        .await;

    assert_eq!(response.status_code(), 200);
    let tokens: TokenResponse = response.json();
    assert_eq!(tokens.user_id, registered.user_id);
    assert_ne!(tokens.access_token, registered.access_token);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new();
    app.register("bob", "secret123").await;

    let wrong_password = app
        .server
        .post("/auth/login")
        .json(&json!({ "username": "bob", "password": "nope" }))
        .await;
    let unknown_user = app
        .server
        .post("/auth/login")
        .json(&json!({ "username": "eve", "password": "secret123" }))
        .await;

    assert_eq!(wrong_password.status_code(), 401);
    assert_eq!(unknown_user.status_code(), 401);
    assert_eq!(wrong_password.header("www-authenticate"), "Bearer");
    assert_eq!(wrong_password.text(), unknown_user.text());
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = TestApp::new();

    let missing = app.server.get("/api/links").await;
    assert_eq!(missing.status_code(), 401);
    let body: Value = missing.json();
    assert_eq!(body["error"]["code"], "unauthorized");

    let malformed = app
        .server
        .get("/api/links")
        .add_header("Authorization", "Bearer")
        .await;
    assert_eq!(malformed.status_code(), 401);

    let garbage = app
        .server
        .get("/api/links")
        .authorization_bearer("not.a.jwt")
        .await;
    assert_eq!(garbage.status_code(), 401);
}

#[tokio::test]
async fn test_refresh_token_is_not_an_access_token() {
    let app = TestApp::new();
    let tokens = app.register("bob", "secret123").await;

    let response = app
        .server
        .get("/api/links")
        .authorization_bearer(&tokens.refresh_token)
        .await;

    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_token_with_unknown_id_is_rejected() {
    let app = TestApp::new();
    let tokens = app.register("bob", "secret123").await;

    // Correctly signed, but never stored in the session store.
    let claims = AccessClaims {
        access_uuid: "00000000-0000-4000-8000-000000000000".to_string(),
        user_id: tokens.user_id.clone(),
        authorized: true,
        exp: tokens.access_expires_at,
    };
    let forged = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(common::ACCESS_SECRET.as_bytes()),
    )
    .unwrap();

    let response = app
        .server
        .get("/api/links")
        .authorization_bearer(&forged)
        .await;

    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_refresh_rotates_tokens() {
    let app = TestApp::new();
    let tokens = app.register("bob", "secret123").await;

    let response = app
        .server
        .post("/auth/refresh")
        .json(&json!({ "refresh_token": tokens.refresh_token }))
        .await;
    assert_eq!(response.status_code(), 200);
    let refreshed: TokenResponse = response.json();
    assert_eq!(refreshed.user_id, tokens.user_id);

    let links = app
        .server
        .get("/api/links")
        .authorization_bearer(&refreshed.access_token)
        .await;
    assert_eq!(links.status_code(), 200);

    let reused = app
        .server
        .post("/auth/refresh")
        .json(&json!({ "refresh_token": tokens.refresh_token }))
        .await;
    assert_eq!(reused.status_code(), 401);
}

#[tokio::test]
async fn test_logout_revokes_access_token() {
    let app = TestApp::new();
    let tokens = app.register("bob", "secret123").await;

    let response = app
        .server
        .post("/auth/logout")
        .authorization_bearer(&tokens.access_token)
        .await;
    assert_eq!(response.status_code(), 204);

    let after = app
        .server
        .get("/api/links")
        .authorization_bearer(&tokens.access_token)
        .await;
    assert_eq!(after.status_code(), 401);

    let again = app
        .server
        .post("/auth/logout")
        .authorization_bearer(&tokens.access_token)
        .await;
    assert_eq!(again.status_code(), 401);
}

#[tokio::test]
async fn test_logout_requires_token() {
    let app = TestApp::new();

    let response = app.server.post("/auth/logout").await;

    assert_eq!(response.status_code(), 401);
}
