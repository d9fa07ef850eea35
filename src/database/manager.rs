use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the store layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("An active task already exists")]
    ActiveTaskExists,

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Builds the shared connection pool and owns schema bootstrap
pub struct DatabaseManager;

impl DatabaseManager {
    /// Read and validate DATABASE_URL
    pub fn database_url() -> Result<String, DatabaseError> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;
        Self::validate_url(&url)?;
        Ok(url)
    }

    fn validate_url(raw: &str) -> Result<url::Url, DatabaseError> {
        let url = url::Url::parse(raw).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        match url.scheme() {
            "postgres" | "postgresql" => Ok(url),
            _ => Err(DatabaseError::InvalidDatabaseUrl),
        }
    }

    /// Connection string safe for logs (password removed)
    pub fn redacted(raw: &str) -> String {
        match url::Url::parse(raw) {
            Ok(mut url) => {
                if url.password().is_some() {
                    let _ = url.set_password(Some("****"));
                }
                url.to_string()
            }
            Err(_) => "<invalid database url>".to_string(),
        }
    }

    /// Connect eagerly; fails fast if the database is unreachable
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let pool = Self::pool_options(config).connect(url).await?;
        info!("Connected to database at {}", Self::redacted(url));
        Ok(pool)
    }

    /// Pool that opens connections on first use
    pub fn connect_lazy(url: &str, config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        Self::validate_url(url)?;
        Ok(Self::pool_options(config).connect_lazy(url)?)
    }

    fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
    }

    /// Apply the bundled migrations
    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations").run(pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }
}

/// True when `err` is a unique violation on the named constraint or index
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation() && db_err.constraint() == Some(constraint))
        .unwrap_or(false)
}
