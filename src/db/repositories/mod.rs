//! Database repositories
//!
//! Postgres implementations of the store traits. Each file covers one table.

pub mod admin_repo;
pub mod event_repo;
pub mod registration_repo;

use sqlx::PgPool;

/// Postgres-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
