//! Route Configuration
//!
//! Configures all HTTP routes for the API. Authentication is per-route via
//! extractors (see `presentation::http::extractors`); this module only
//! wires paths to handlers and applies the Prometheus metrics endpoint.

use axum::{
    response::IntoResponse,
    routing::{get, post},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let body = metrics::gather_metrics();
    (
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/status", status_routes())
        .nest("/sessions", session_routes())
        .nest("/machines", machine_routes())
        .nest("/activities", activity_routes())
        .nest("/app-usages", app_usage_routes())
        .nest("/system-metrics", system_metrics_routes())
        .nest("/session-events", session_event_routes())
        .nest("/roles", role_routes())
        .nest("/disciplines", discipline_routes())
        .nest("/user-role-disciplines", user_role_discipline_routes())
        .route("/batch", post(handlers::batch::ingest))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/refresh", post(handlers::auth::refresh))
        .route("/logout", post(handlers::auth::logout))
        .route("/service-token", post(handlers::auth::issue_service_token))
}

fn status_routes() -> Router<AppState> {
    Router::new()
        .route("/ping", get(handlers::status::ping))
        .route("/health", get(handlers::status::health))
}

fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::sessions::resolve))
        .route("/:id/end", post(handlers::sessions::end))
        .route("/:id/chain", get(handlers::sessions::chain))
        .route("/:id/chain/stats", get(handlers::sessions::chain_stats))
        .route("/:id/batch", post(handlers::batch::ingest_for_session))
        .route("/:id/afk-periods", get(handlers::afk_periods::list_for_session))
}

fn machine_routes() -> Router<AppState> {
    Router::new().route("/handshake", post(handlers::machines::handshake))
}

fn activity_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::activities::create).get(handlers::activities::list))
        .route("/session/:session_id", get(handlers::activities::list_for_session))
}

fn app_usage_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::app_usages::create).get(handlers::app_usages::list))
        .route("/session/:session_id", get(handlers::app_usages::list_for_session))
}

fn system_metrics_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::system_metrics::create).get(handlers::system_metrics::list))
        .route("/session/:session_id", get(handlers::system_metrics::list_for_session))
}

fn session_event_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::session_events::create).get(handlers::session_events::list))
        .route("/session/:session_id", get(handlers::session_events::list_for_session))
}

fn role_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::roles::create).get(handlers::roles::list))
        .route(
            "/:id",
            get(handlers::roles::get)
                .put(handlers::roles::update)
                .delete(handlers::roles::delete),
        )
}

fn discipline_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::disciplines::create).get(handlers::disciplines::list))
        .route(
            "/:id",
            get(handlers::disciplines::get)
                .put(handlers::disciplines::update)
                .delete(handlers::disciplines::delete),
        )
}

fn user_role_discipline_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(handlers::user_role_disciplines::create).get(handlers::user_role_disciplines::list),
        )
        .route(
            "/:id",
            get(handlers::user_role_disciplines::get).delete(handlers::user_role_disciplines::delete),
        )
        .route("/user/:user_id", get(handlers::user_role_disciplines::list_for_user))
}
