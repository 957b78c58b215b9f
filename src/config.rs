//! Configuration from CLI arguments and environment, validated at startup.

use std::time::Duration;

use clap::{Parser, ValueEnum};
use contacts_db::DbConfig;
use contacts_telemetry::TelemetryConfig;
use secrecy::{ExposeSecret, SecretString};

/// Minimum required JWT secret length for security (256 bits).
const MIN_JWT_SECRET_LEN: usize = 32;

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// PostgreSQL via `DB_URL`.
    Postgres,
    /// Process-local store; data is lost on restart.
    Memory,
}

/// Contacts HTTP service configuration.
///
/// All values can be set via environment variables or CLI arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "contacts-service", about = "Multi-user contact book HTTP service")]
pub struct Config {
    /// HTTP listen address
    #[arg(long, env = "HTTP_ADDRESS", default_value = "0.0.0.0:5000")]
    pub http_address: String,

    /// CORS allowed origins (comma-separated, or "*" for any)
    #[arg(long, env = "CORS_ALLOW_ORIGINS")]
    pub cors_allow_origins: Option<String>,

    /// JWT secret key for signing tokens (min 32 chars)
    #[arg(long, env = "JWT_SECRET_KEY")]
    pub jwt_secret_key: SecretString,

    /// Access token TTL in minutes
    #[arg(long, env = "ACCESS_TOKEN_TTL_MINUTES", default_value = "60")]
    pub access_token_ttl_minutes: u64,

    /// Storage backend
    #[arg(long, env = "STORE", value_enum, default_value = "postgres")]
    pub store: StoreKind,

    /// Database connection URL (required for the postgres store)
    #[arg(long, env = "DB_URL")]
    pub db_url: Option<String>,

    /// Database password (URL-encoded and inserted into DB_URL)
    #[arg(long, env = "DB_PASSWORD")]
    pub db_password: Option<String>,

    /// Database pool minimum connections
    #[arg(long, env = "DB_POOL_MIN", default_value = "1")]
    pub db_pool_min: u32,

    /// Database pool maximum connections
    #[arg(long, env = "DB_POOL_MAX", default_value = "10")]
    pub db_pool_max: u32,

    /// Database connection timeout in seconds
    #[arg(long, env = "DB_CONNECT_TIMEOUT", default_value = "5")]
    pub db_connect_timeout_secs: u64,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(long, env = "LOG_LEVEL", default_value = "INFO")]
    pub log_level: String,

    /// Use JSON log format
    #[arg(long, env = "JSON_LOGS", default_value = "false")]
    pub json_logs: bool,
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JWT secret must be at least {MIN_JWT_SECRET_LEN} characters")]
    JwtSecretTooShort,
    #[error("Access token TTL must be > 0")]
    InvalidAccessTokenTtl,
    #[error("DB_URL is required when STORE=postgres")]
    MissingDatabaseUrl,
    #[error("Database pool max ({max}) must be >= min ({min})")]
    InvalidPoolSize { min: u32, max: u32 },
}

impl Config {
    /// Parse and validate configuration.
    pub fn init() -> anyhow::Result<Self> {
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret_key.expose_secret().len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::JwtSecretTooShort);
        }
        if self.access_token_ttl_minutes == 0 {
            return Err(ConfigError::InvalidAccessTokenTtl);
        }
        if self.store == StoreKind::Postgres && self.db_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }
        if self.db_pool_max < self.db_pool_min {
            return Err(ConfigError::InvalidPoolSize {
                min: self.db_pool_min,
                max: self.db_pool_max,
            });
        }
        Ok(())
    }

    /// Get database connection timeout as Duration.
    #[inline]
    pub const fn db_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.db_connect_timeout_secs)
    }

    /// Build the database URL with password substitution.
    pub fn database_url(&self) -> Option<String> {
        let url = self.db_url.as_deref()?;
        Some(match &self.db_password {
            Some(password) => {
                let encoded = urlencoding::encode(password);
                url.replacen(":@", &format!(":{encoded}@"), 1)
            }
            None => url.to_string(),
        })
    }

    /// Pool settings for the postgres store.
    pub fn db_config(&self) -> Option<DbConfig> {
        Some(DbConfig {
            url: self.database_url()?,
            pool_min: self.db_pool_min,
            pool_max: self.db_pool_max,
            connect_timeout: self.db_connect_timeout(),
        })
    }

    /// Logging settings.
    pub fn telemetry(&self) -> TelemetryConfig {
        TelemetryConfig {
            log_level: self.log_level.clone(),
            json_logs: self.json_logs,
        }
    }
}
