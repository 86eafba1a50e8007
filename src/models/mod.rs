//! Domain models
//!
//! Row types shared by the stores, plus the domain enums and store outcomes.

pub mod admin;
pub mod event;
pub mod registration;

pub use admin::*;
pub use event::*;
pub use registration::*;
