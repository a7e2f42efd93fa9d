//! Common Test Utilities
//!
//! Shared harness for HTTP-level integration tests. Requires a reachable
//! Postgres instance; point `DATABASE_URL` (or `TEST_DATABASE_URL`) at a
//! throwaway database before running `cargo test --test integration_tests`.
//! Each `TestApp::spawn()` call runs migrations against that database, so
//! tests only need distinct usernames/hostnames to stay independent of
//! each other, not a fresh database per test.

use activity_tracker_server::config::Settings;
use activity_tracker_server::startup::Application;
use axum_test::TestServer;
use fake::faker::internet::en::SafeEmail;
use fake::Fake;
use serde_json::{json, Value};
use uuid::Uuid;

pub struct TestApp {
    pub server: TestServer,
}

impl TestApp {
    /// Build a fresh application against the configured test database and
    /// wrap its router in an in-process `TestServer` (no socket is bound).
    pub async fn spawn() -> TestApp {
        if std::env::var("DATABASE_URL").is_err() {
            if let Ok(test_url) = std::env::var("TEST_DATABASE_URL") {
                std::env::set_var("DATABASE_URL", test_url);
            }
        }
        std::env::set_var("RUN_ENV", "test");
        std::env::set_var("APP__SERVER__PORT", "0");

        let settings = Settings::load().expect("failed to load test settings");
        let application = Application::build(settings)
            .await
            .expect("failed to build application against the test database");

        let server = TestServer::new(application.router()).expect("failed to start test server");

        TestApp { server }
    }

    /// Register a fresh user and log in, returning `(user_id, access_token)`.
    pub async fn register_and_login(&self) -> (String, String) {
        let username = unique_username();
        let password = "CorrectHorseBatteryStaple9!";

        let register = self
            .server
            .post("/api/auth/register")
            .json(&json!({
                "username": username,
                "email": unique_email(),
                "password": password,
            }))
            .await;
        register.assert_status(axum::http::StatusCode::CREATED);
        let register_body: Value = register.json();
        let user_id = register_body["user"]["id"].as_str().unwrap().to_string();

        let login = self
            .server
            .post("/api/auth/login")
            .json(&json!({ "username": username, "password": password }))
            .await;
        login.assert_status_ok();
        let login_body: Value = login.json();
        let access_token = login_body["access_token"].as_str().unwrap().to_string();

        (user_id, access_token)
    }

    /// Run a machine handshake and return the machine id.
    pub async fn handshake_machine(&self, access_token: &str) -> String {
        let response = self
            .server
            .post("/api/machines/handshake")
            .authorization_bearer(access_token)
            .json(&json!({
                "hostname": unique_hostname(),
                "unique_id": Uuid::new_v4().to_string(),
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        let body: Value = response.json();
        body["id"].as_str().unwrap().to_string()
    }
}

pub fn unique_username() -> String {
    format!("user_{}", &Uuid::new_v4().to_string()[..12])
}

/// `fake` generates the local/domain shape; the uuid suffix keeps two
/// calls from colliding on the `users.email` unique constraint.
pub fn unique_email() -> String {
    let base: String = SafeEmail().fake();
    let (local, domain) = base.split_once('@').unwrap_or((base.as_str(), "example.com"));
    format!("{local}+{}@{domain}", &Uuid::new_v4().to_string()[..8])
}

pub fn unique_hostname() -> String {
    format!("host-{}", &Uuid::new_v4().to_string()[..8])
}
