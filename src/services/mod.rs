//! Business logic services

pub mod analytics_service;
pub mod auth_service;
pub mod event_service;
pub mod notification;
pub mod registration_service;

pub use analytics_service::AnalyticsService;
pub use auth_service::AuthService;
pub use event_service::EventService;
pub use notification::{Notifier, notifier_from_config};
pub use registration_service::RegistrationService;
