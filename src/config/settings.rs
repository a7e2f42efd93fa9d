//! Application settings and configuration structures.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// Database configuration (PostgreSQL)
    pub database: DatabaseSettings,

    /// Authentication and token-expiry configuration
    pub auth: AuthSettings,

    /// Background token-sweep configuration
    pub token_sweep: TokenSweepSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// PostgreSQL database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections to maintain
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    pub acquire_timeout: u64,
}

/// Authentication and token lifecycle configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// Whether to synthesize a user on first-seen username from a trusted agent
    pub auto_create_users: bool,

    /// Email domain used to synthesize an address for auto-created users
    pub email_domain: String,

    /// User token lifetime in hours
    pub user_token_expiry_hours: i64,

    /// Service token lifetime in days
    pub service_token_expiry_days: i64,

    /// Refresh token lifetime in days
    pub refresh_token_expiry_days: i64,

    /// API key lifetime in days
    pub api_key_expiry_days: i64,
}

/// Background token-expiry sweep configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenSweepSettings {
    /// Interval between sweeps, in seconds
    pub interval_seconds: u64,
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // Determine the running environment
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        let db_url = std::env::var("DATABASE_URL").ok().or_else(|| {
            let host = std::env::var("DB_HOST").ok()?;
            let port = std::env::var("DB_PORT").unwrap_or_else(|_| "5432".into());
            let name = std::env::var("DB_NAME").ok()?;
            let user = std::env::var("DB_USER").ok()?;
            let password = std::env::var("DB_PASSWORD").unwrap_or_default();
            Some(format!(
                "postgres://{user}:{password}@{host}:{port}/{name}"
            ))
        });

        Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout", 30)?
            .set_default("auth.auto_create_users", true)?
            .set_default("auth.email_domain", "agents.local")?
            .set_default("auth.user_token_expiry_hours", 24)?
            .set_default("auth.service_token_expiry_days", 7)?
            .set_default("auth.refresh_token_expiry_days", 30)?
            .set_default("auth.api_key_expiry_days", 365)?
            .set_default("token_sweep.interval_seconds", 3600)?
            // Load from config files
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Load from environment variables
            // APP__SERVER__PORT=3000 -> server.port = 3000
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Map simple environment variables named by the external interface
            .set_override_option("server.host", std::env::var("HTTP_LISTEN").ok())?
            .set_override_option("database.url", db_url)?
            .set_override_option(
                "auth.auto_create_users",
                std::env::var("AUTO_CREATE_USERS").ok(),
            )?
            .set_override_option("auth.email_domain", std::env::var("EMAIL_DOMAIN").ok())?
            .set_override_option(
                "token_sweep.interval_seconds",
                std::env::var("TOKEN_SWEEP_INTERVAL_SECONDS").ok(),
            )?
            .build()?
            .try_deserialize()
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl DatabaseSettings {
    /// Get the connection URL.
    pub fn connection_url(&self) -> &str {
        &self.url
    }
}
