//! Health check handlers

use axum::{Json, Router, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{state::AppState, utils::now_utc};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Event check-in API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: now_utc(),
    })
}

/// Health routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
