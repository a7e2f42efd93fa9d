//! Status endpoint tests: liveness (no auth) and health (user auth).

use crate::common::TestApp;

#[tokio::test]
async fn ping_returns_ok_without_auth() {
    let app = TestApp::spawn().await;

    let response = app.server.get("/api/status/ping").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn health_requires_a_user_credential() {
    let app = TestApp::spawn().await;

    let response = app.server.get("/api/status/health").await;

    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_reports_healthy_database_for_an_authenticated_user() {
    let app = TestApp::spawn().await;
    let (_user_id, token) = app.register_and_login().await;

    let response = app
        .server
        .get("/api/status/health")
        .authorization_bearer(&token)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["database"]["latency_ms"].is_u64());
}
