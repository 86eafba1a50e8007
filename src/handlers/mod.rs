//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod analytics;
pub mod auth;
pub mod events;
pub mod health;
pub mod registrations;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .nest("/auth", auth::routes(state.clone()))
        .nest("/events", events::routes(state.clone()))
        .nest("/registrations", registrations::routes(state.clone()))
        .nest("/analytics", analytics::routes(state))
}
