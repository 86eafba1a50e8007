//! Database connection management

use std::sync::Arc;

use sqlx::{PgPool, postgres::PgPoolOptions};

use super::{MemoryStore, PgStore, Store, run_migrations};
use crate::{config::DatabaseConfig, error::AppResult};

/// Create a new database connection pool
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await
}

/// Open the configured store, running migrations for Postgres
pub async fn open_store(config: &DatabaseConfig) -> AppResult<Arc<dyn Store>> {
    if config.is_memory() {
        tracing::warn!("Using the in-memory store; data is lost on restart");
        return Ok(Arc::new(MemoryStore::new()));
    }

    tracing::info!("Connecting to database...");
    let pool = create_pool(config).await?;

    tracing::info!("Running database migrations...");
    run_migrations(&pool).await?;

    Ok(Arc::new(PgStore::new(pool)))
}
