//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

pub mod activities;
pub mod afk_periods;
pub mod app_usages;
pub mod auth;
pub mod batch;
pub mod disciplines;
pub mod machines;
pub mod roles;
pub mod session_events;
pub mod sessions;
pub mod status;
pub mod system_metrics;
pub mod user_role_disciplines;
