//! # Activity Tracker Server
//!
//! Ingestion and authorization backend for desktop activity-tracking agents.
//!
//! This is the application entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Database connection pool and migrations
//! - The token store and background expiry sweep
//! - The HTTP server

use anyhow::Result;
use tracing::info;

use activity_tracker_server::config::Settings;
use activity_tracker_server::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    activity_tracker_server::telemetry::init_tracing();

    info!("Starting Activity Tracker Server...");

    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
