//! Session resolution and chain inspection tests.

use activity_tracker_server::application::services::{ResolveInput, SessionEngine};
use activity_tracker_server::config::Settings;
use activity_tracker_server::infrastructure::database::create_pool;
use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::common::TestApp;

#[tokio::test]
async fn resolve_creates_a_new_active_session() {
    let app = TestApp::spawn().await;
    let (_user_id, token) = app.register_and_login().await;
    let machine_id = app.handshake_machine(&token).await;

    let response = app
        .server
        .post("/api/sessions")
        .authorization_bearer(&token)
        .json(&json!({ "machine_id": machine_id }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["logout_time"].is_null());
    assert_eq!(body["machine_id"], machine_id);
}

#[tokio::test]
async fn resolve_twice_without_ending_returns_the_same_active_session() {
    let app = TestApp::spawn().await;
    let (_user_id, token) = app.register_and_login().await;
    let machine_id = app.handshake_machine(&token).await;

    let first = app
        .server
        .post("/api/sessions")
        .authorization_bearer(&token)
        .json(&json!({ "machine_id": machine_id }))
        .await;
    let first_body: serde_json::Value = first.json();

    let second = app
        .server
        .post("/api/sessions")
        .authorization_bearer(&token)
        .json(&json!({ "machine_id": machine_id }))
        .await;
    let second_body: serde_json::Value = second.json();

    assert_eq!(first_body["id"], second_body["id"]);
}

#[tokio::test]
async fn ending_a_session_sets_logout_time() {
    let app = TestApp::spawn().await;
    let (_user_id, token) = app.register_and_login().await;
    let machine_id = app.handshake_machine(&token).await;

    let resolved = app
        .server
        .post("/api/sessions")
        .authorization_bearer(&token)
        .json(&json!({ "machine_id": machine_id }))
        .await;
    let session_id = resolved.json::<serde_json::Value>()["id"].as_str().unwrap().to_string();

    let ended = app
        .server
        .post(&format!("/api/sessions/{session_id}/end"))
        .authorization_bearer(&token)
        .json(&json!({}))
        .await;

    ended.assert_status_ok();
    let body: serde_json::Value = ended.json();
    assert!(body["logout_time"].is_string());
}

#[tokio::test]
async fn chain_lists_at_least_the_session_itself() {
    let app = TestApp::spawn().await;
    let (_user_id, token) = app.register_and_login().await;
    let machine_id = app.handshake_machine(&token).await;

    let resolved = app
        .server
        .post("/api/sessions")
        .authorization_bearer(&token)
        .json(&json!({ "machine_id": machine_id }))
        .await;
    let session_id = resolved.json::<serde_json::Value>()["id"].as_str().unwrap().to_string();

    let chain = app
        .server
        .get(&format!("/api/sessions/{session_id}/chain"))
        .authorization_bearer(&token)
        .await;

    chain.assert_status_ok();
    let body: serde_json::Value = chain.json();
    let sessions = body["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["id"], session_id);
}

/// spec.md §8 scenario 3: a session ended via a standalone `end_session`
/// call (not one `resolve_or_create` closed itself) must still be the
/// continuity link when the chain resumes on a later day. The HTTP
/// `resolve`/`end` handlers always stamp `Utc::now()`, so driving the
/// two calendar days apart needs the engine directly with explicit
/// instants, alongside real user/machine rows created over HTTP.
#[tokio::test]
async fn resolving_a_new_day_continues_from_a_session_closed_earlier() {
    let app = TestApp::spawn().await;
    let (user_id, token) = app.register_and_login().await;
    let machine_id = app.handshake_machine(&token).await;
    let user_id: Uuid = user_id.parse().unwrap();
    let machine_id: Uuid = machine_id.parse().unwrap();

    let settings = Settings::load().expect("failed to load test settings");
    let pool = create_pool(&settings.database).await.expect("failed to connect to test database");
    let engine = SessionEngine::new(pool);

    let day_one_login: DateTime<Utc> = "2024-03-01T09:00:00Z".parse().unwrap();
    let day_one_logout: DateTime<Utc> = "2024-03-01T17:00:00Z".parse().unwrap();
    let day_two_resolve: DateTime<Utc> = "2024-03-02T08:30:00Z".parse().unwrap();

    let s1 = engine
        .resolve_or_create(ResolveInput {
            user_id,
            machine_id,
            now: day_one_login,
            ip_address: None,
            session_data: None,
        })
        .await
        .unwrap();

    engine.end_session(s1, day_one_logout, Some(user_id)).await.unwrap();

    let s2 = engine
        .resolve_or_create(ResolveInput {
            user_id,
            machine_id,
            now: day_two_resolve,
            ip_address: None,
            session_data: None,
        })
        .await
        .unwrap();

    assert_ne!(s1, s2);

    let chain = engine.get_chain(s2).await.unwrap();
    assert_eq!(chain.len(), 2);
    assert_eq!(chain[0].id, s1);
    assert_eq!(chain[1].id, s2);
    assert_eq!(chain[1].continued_from_session, Some(s1));
    assert_eq!(chain[1].previous_session_end_time, Some(day_one_logout));
    assert_eq!(chain[1].time_since_previous_session, Some(55_800));
    assert_eq!(chain[0].continued_by_session, Some(s2));
}
