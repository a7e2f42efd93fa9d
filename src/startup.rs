//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;

use crate::application::services::{AuthFramework, AuthService, BatchPipeline, SessionEngine};
use crate::config::Settings;
use crate::infrastructure::database;
use crate::infrastructure::repositories::{PgTokenRepository, PgUserRepository, PgUserRoleDisciplineRepository};
use crate::infrastructure::token_store::TokenStore;
use crate::presentation::http::handlers::status::init_server_start;
use crate::presentation::http::routes;
use crate::presentation::middleware::{create_cors_layer, create_security_headers_layer, create_trace_layer};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub settings: Arc<Settings>,
    pub token_store: Arc<TokenStore>,
    pub auth_framework: Arc<AuthFramework>,
    pub auth_service: Arc<AuthService>,
    pub session_engine: Arc<SessionEngine>,
    pub batch_pipeline: Arc<BatchPipeline>,
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        init_server_start();

        let db = database::create_pool(&settings.database).await?;
        tracing::info!("Database connection pool created");

        database::run_migrations(&db).await?;
        tracing::info!("Database migrations applied");

        let user_repo = Arc::new(PgUserRepository::new(db.clone()));
        let urd_repo = Arc::new(PgUserRoleDisciplineRepository::new(db.clone()));
        let token_repo = Arc::new(PgTokenRepository::new(db.clone()));

        let token_store = Arc::new(TokenStore::new(token_repo));
        let loaded = token_store.load_active().await?;
        tracing::info!(count = loaded, "loaded active tokens into the token store");

        let auth_framework = Arc::new(AuthFramework::new(
            token_store.clone(),
            user_repo.clone(),
            settings.auth.auto_create_users,
            settings.auth.email_domain.clone(),
        ));

        let auth_service = Arc::new(AuthService::new(
            user_repo,
            urd_repo,
            token_store.clone(),
            settings.auth.clone(),
        ));

        let session_engine = Arc::new(SessionEngine::new(db.clone()));
        let batch_pipeline = Arc::new(BatchPipeline::new(db.clone()));

        spawn_token_sweep(token_store.clone(), settings.token_sweep.interval_seconds);

        let state = AppState {
            db,
            settings: Arc::new(settings.clone()),
            token_store,
            auth_framework,
            auth_service,
            session_engine,
            batch_pipeline,
        };

        let router = routes::create_router(state)
            .layer(create_trace_layer())
            .layer(create_cors_layer())
            .layer(create_security_headers_layer());

        let addr = SocketAddr::from(([0, 0, 0, 0], settings.server.port));
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Clone of the assembled router, for in-process test harnesses that
    /// drive requests without binding a real socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Periodically sweeps expired tokens from both the store and the
/// underlying table, per §4.1/§5's background maintenance note.
fn spawn_token_sweep(token_store: Arc<TokenStore>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_seconds));
        loop {
            ticker.tick().await;
            match token_store.sweep_expired().await {
                Ok(deleted) if deleted > 0 => {
                    tracing::info!(deleted, "token sweep: removed expired tokens");
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "token sweep failed"),
            }
        }
    });
}
