//! EventDesk - Event Registration and QR Check-in
//!
//! Backend for a student organization's events: administrators publish
//! events with a fixed capacity, students register without an account and
//! receive a QR code by email, and staff scan that code at the door.
//!
//! # Features
//!
//! - Capacity-limited registration with atomic seat reservation
//! - One-way QR check-in
//! - Self-service cancellation by student email
//! - Admin dashboard analytics
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Business logic
//! - **Store**: Persistence traits with Postgres and in-memory backends
//! - **Models**: Domain models and store outcomes

pub mod app;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used types
pub use app::build_router;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
