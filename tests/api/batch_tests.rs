//! Batch ingest endpoint tests.

use serde_json::json;

use crate::common::TestApp;

async fn resolved_session(app: &TestApp, token: &str) -> String {
    let machine_id = app.handshake_machine(token).await;
    let resolved = app
        .server
        .post("/api/sessions")
        .authorization_bearer(token)
        .json(&json!({ "machine_id": machine_id }))
        .await;
    resolved.json::<serde_json::Value>()["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn ingest_for_session_processes_mixed_streams() {
    let app = TestApp::spawn().await;
    let (_user_id, token) = app.register_and_login().await;
    let session_id = resolved_session(&app, &token).await;

    let response = app
        .server
        .post(&format!("/api/sessions/{session_id}/batch"))
        .authorization_bearer(&token)
        .json(&json!({
            "activity_events": [
                { "event_type": "keyboard", "event_time": "2026-01-01T00:00:00Z" },
                { "event_type": "not_a_real_type", "event_time": "2026-01-01T00:00:01Z" },
            ],
            "app_usages": [
                { "app_id": uuid::Uuid::new_v4(), "start_time": "2026-01-01T00:00:00Z" },
            ],
            "system_metrics": [
                { "cpu_usage": 250.0, "gpu_usage": -10.0, "memory_usage": 40.0, "measurement_time": "2026-01-01T00:00:00Z" },
            ],
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["session_id"], session_id);
    assert!(body["success"].as_bool().unwrap());
    assert_eq!(body["processed_counts"]["activity_events_success"], 2);
    assert_eq!(body["processed_counts"]["activity_events_failure"], 0);
    assert_eq!(body["processed_counts"]["app_usages_success"], 1);
    assert_eq!(body["processed_counts"]["system_metrics_success"], 1);
}

#[tokio::test]
async fn ingest_without_a_resolvable_session_returns_not_found() {
    let app = TestApp::spawn().await;
    let (_user_id, token) = app.register_and_login().await;

    let response = app
        .server
        .post(&format!("/api/sessions/{}/batch", uuid::Uuid::new_v4()))
        .authorization_bearer(&token)
        .json(&json!({ "activity_events": [] }))
        .await;

    response.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn top_level_batch_endpoint_accepts_session_id_in_body() {
    let app = TestApp::spawn().await;
    let (_user_id, token) = app.register_and_login().await;
    let session_id = resolved_session(&app, &token).await;

    let response = app
        .server
        .post("/api/batch")
        .authorization_bearer(&token)
        .json(&json!({
            "session_id": session_id,
            "activity_events": [
                { "event_type": "mouse_click", "event_time": "2026-01-01T00:00:00Z" },
            ],
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["session_id"], session_id);
}
