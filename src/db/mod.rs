//! Database module
//!
//! Store traits, their Postgres and in-memory implementations, and
//! connection/migration helpers.

pub mod connection;
pub mod memory;
pub mod repositories;
pub mod store;

use sqlx::PgPool;

pub use connection::*;
pub use memory::MemoryStore;
pub use repositories::PgStore;
pub use store::{AdminStore, EventStore, RegistrationStore, Store};

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
