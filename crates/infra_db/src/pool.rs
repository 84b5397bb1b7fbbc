//! Connection pool management

use std::time::Duration;

use sqlx::sqlite::SqlitePoolOptions;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::DatabaseError;

/// Shared SQLite connection pool
pub type DbPool = sqlx::SqlitePool;

/// Connects with default pool settings
pub async fn connect(database_url: &str) -> Result<DbPool, DatabaseError> {
    let config = DatabaseConfig {
        database_url: database_url.to_string(),
        ..DatabaseConfig::default()
    };
    connect_with_config(&config).await
}

/// Connects using the given configuration
///
/// Foreign keys are enforced on every connection so dependent rows (approvals,
/// documents) stay tied to their claim.
pub async fn connect_with_config(config: &DatabaseConfig) -> Result<DbPool, DatabaseError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs.max(1)))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                sqlx::query("PRAGMA foreign_keys = ON").execute(&mut *conn).await?;
                sqlx::query("PRAGMA busy_timeout = 5000").execute(&mut *conn).await?;
                Ok(())
            })
        })
        .connect(&config.database_url)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!(url = %config.database_url, "database pool ready");
    Ok(pool)
}
