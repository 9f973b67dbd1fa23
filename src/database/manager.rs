use sqlx::{postgres::PgPoolOptions, Executor, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Bootstrap schema applied by `migrate`; every statement is idempotent
const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Classify an sqlx error, pulling unique violations out of the generic bucket
    pub fn from_write(err: sqlx::Error) -> Self {
        match err.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => {
                DatabaseError::UniqueViolation(db_err.constraint().unwrap_or("unknown").to_string())
            }
            _ => DatabaseError::Sqlx(err),
        }
    }
}

/// Owns pool construction and schema management for the single application database
pub struct DatabaseManager;

impl DatabaseManager {
    /// Build the connection pool described by config
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        if config.url.is_empty() {
            return Err(DatabaseError::ConfigMissing("DATABASE_URL"));
        }
        let redacted = Self::redact_url(&config.url)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&config.url)
            .await?;

        info!("Created database pool for: {}", redacted);
        Ok(pool)
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Create missing tables and indexes
    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        // Plain &str executes over the simple query protocol, which allows several statements
        pool.execute(SCHEMA_SQL).await?;
        info!("Database schema is up to date");
        Ok(())
    }

    /// Parse the DSN and mask its password so it can be logged
    pub fn redact_url(database_url: &str) -> Result<String, DatabaseError> {
        let mut url = url::Url::parse(database_url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if !matches!(url.scheme(), "postgres" | "postgresql") {
            return Err(DatabaseError::InvalidDatabaseUrl);
        }
        if url.password().is_some() {
            url.set_password(Some("****")).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        }
        Ok(url.into())
    }
}
