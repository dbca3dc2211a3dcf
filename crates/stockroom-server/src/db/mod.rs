//! Connection pool bootstrap and database error helpers

use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Error as SqlxError;
use std::time::Duration;

use crate::config::DatabaseConfig;

/// Open the pool and bring the schema up to date
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, SqlxError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(&config.url)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Database connection pool created"
    );

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .map_err(|e| SqlxError::Migrate(Box::new(e)))?;

    tracing::info!("Database migrations completed");

    Ok(pool)
}

/// Check if the error is a unique constraint violation
pub fn is_unique_violation(error: &SqlxError) -> bool {
    if let SqlxError::Database(db_err) = error {
        return db_err.is_unique_violation();
    }
    false
}
