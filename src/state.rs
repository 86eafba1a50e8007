//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use redis::aio::ConnectionManager;

use crate::{config::Config, db::Store, services::Notifier};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Persistence (Postgres or in-memory)
    store: Arc<dyn Store>,

    /// Confirmation email dispatch
    notifier: Arc<dyn Notifier>,

    /// Redis connection manager; rate limiting is off without it
    redis: Option<ConnectionManager>,

    /// Application configuration
    config: Config,
}

impl AppState {
    /// Create a new application state
    pub fn new(
        store: Arc<dyn Store>,
        notifier: Arc<dyn Notifier>,
        redis: Option<ConnectionManager>,
        config: Config,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store,
                notifier,
                redis,
                config,
            }),
        }
    }

    /// Get a reference to the store
    pub fn store(&self) -> &dyn Store {
        self.inner.store.as_ref()
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.inner.notifier.as_ref()
    }

    /// Get a clone of the Redis connection manager, if configured
    pub fn redis(&self) -> Option<ConnectionManager> {
        self.inner.redis.clone()
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
