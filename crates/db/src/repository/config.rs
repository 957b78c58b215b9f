//! Database configuration, pool creation, and migrations.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::AppError;

/// Database configuration.
#[derive(Debug, Clone)]
#[must_use]
pub struct DbConfig {
    pub url: String,
    pub pool_min: u32,
    pub pool_max: u32,
    pub connect_timeout: Duration,
}

impl DbConfig {
    /// Default minimum pool connections.
    pub const DEFAULT_POOL_MIN: u32 = 1;
    /// Default maximum pool connections.
    pub const DEFAULT_POOL_MAX: u32 = 10;
    /// Default connection timeout.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a configuration from a URL with default pool settings.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            pool_min: Self::DEFAULT_POOL_MIN,
            pool_max: Self::DEFAULT_POOL_MAX,
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

/// Create database connection pool.
pub async fn create_pool(config: &DbConfig) -> Result<PgPool, AppError> {
    PgPoolOptions::new()
        .min_connections(config.pool_min)
        .max_connections(config.pool_max)
        .acquire_timeout(config.connect_timeout)
        .connect(&config.url)
        .await
        .map_err(|e| AppError::Internal(format!("Database connection failed: {e}")))
}

/// Apply the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::Internal(format!("Database migration failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_url_uses_defaults() {
        let config = DbConfig::from_url("postgres://localhost/contacts");
        assert_eq!(config.url, "postgres://localhost/contacts");
        assert_eq!(config.pool_min, DbConfig::DEFAULT_POOL_MIN);
        assert_eq!(config.pool_max, DbConfig::DEFAULT_POOL_MAX);
        assert_eq!(config.connect_timeout, DbConfig::DEFAULT_CONNECT_TIMEOUT);
    }
}
