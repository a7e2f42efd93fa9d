//! Authentication API Tests

use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

use crate::common::{unique_email, unique_username, TestApp};

#[tokio::test]
async fn register_with_valid_data_returns_tokens() {
    let app = TestApp::spawn().await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "username": unique_username(),
            "email": unique_email(),
            "password": "ValidPassword123!",
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert!(body["access_token"].is_string());
    assert!(body["refresh_token"].is_string());
    assert_eq!(body["user"]["verified"], true);
}

#[test_case("not-an-email", "ValidPassword123!"; "invalid email")]
#[test_case("placeholder", "short"; "short password")]
#[tokio::test]
async fn register_with_invalid_field_fails_validation(email: &str, password: &str) {
    let app = TestApp::spawn().await;
    let email = if email == "placeholder" { unique_email() } else { email.to_string() };

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "username": unique_username(),
            "email": email,
            "password": password,
        }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_with_duplicate_username_fails_with_conflict() {
    let app = TestApp::spawn().await;
    let username = unique_username();
    let body = json!({
        "username": username,
        "email": unique_email(),
        "password": "ValidPassword123!",
    });

    app.server.post("/api/auth/register").json(&body).await.assert_status(axum::http::StatusCode::CREATED);

    let second = json!({
        "username": username,
        "email": unique_email(),
        "password": "ValidPassword123!",
    });
    let response = app.server.post("/api/auth/register").json(&second).await;

    response.assert_status(axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_with_valid_credentials_returns_access_and_refresh_tokens() {
    let app = TestApp::spawn().await;
    let username = unique_username();
    let password = "ValidPassword123!";
    app.server
        .post("/api/auth/register")
        .json(&json!({ "username": username, "email": unique_email(), "password": password }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "username": username, "password": password }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["access_token"].is_string());
    assert!(body["refresh_token"].is_string());
}

#[tokio::test]
async fn login_with_wrong_password_fails_with_unauthorized() {
    let app = TestApp::spawn().await;
    let username = unique_username();
    app.server
        .post("/api/auth/register")
        .json(&json!({ "username": username, "email": unique_email(), "password": "ValidPassword123!" }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "username": username, "password": "WrongPassword123!" }))
        .await;

    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_with_valid_refresh_token_issues_a_new_access_token() {
    let app = TestApp::spawn().await;
    let username = unique_username();
    let password = "ValidPassword123!";
    let register = app
        .server
        .post("/api/auth/register")
        .json(&json!({ "username": username, "email": unique_email(), "password": password }))
        .await;
    let register_body: serde_json::Value = register.json();
    let refresh_token = register_body["refresh_token"].as_str().unwrap().to_string();

    let response = app
        .server
        .post("/api/auth/refresh")
        .json(&json!({ "refresh_token": refresh_token }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["access_token"].is_string());
}

#[tokio::test]
async fn logout_revokes_the_access_token() {
    let app = TestApp::spawn().await;
    let (_user_id, access_token) = app.register_and_login().await;

    let logout = app
        .server
        .post("/api/auth/logout")
        .authorization_bearer(&access_token)
        .await;
    logout.assert_status(axum::http::StatusCode::NO_CONTENT);

    let reused = app
        .server
        .get("/api/status/health")
        .authorization_bearer(&access_token)
        .await;
    reused.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_endpoint_rejects_requests_without_a_token() {
    let app = TestApp::spawn().await;

    let response = app.server.post("/api/sessions").json(&json!({ "machine_id": uuid::Uuid::new_v4() })).await;

    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_endpoint_works_with_a_valid_token() {
    let app = TestApp::spawn().await;
    let (_user_id, token) = app.register_and_login().await;

    let response = app
        .server
        .get("/api/status/health")
        .authorization_bearer(&token)
        .await;

    response.assert_status_ok();
}
