//! Utility functions

pub mod crypto;
pub mod qr;
pub mod time;
pub mod validation;

pub use crypto::generate_check_in_token;
pub use time::now_utc;
pub use validation::normalize_email;
