//! Input validation utilities
//!
//! Custom validators plugged into `validator` derives on request DTOs.

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

use crate::{constants, models::EventStatus};

/// 24-hour wall-clock time, `HH:MM`
static TIME_OF_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("valid regex"));

/// Digits with optional spaces, dashes, parentheses and a leading plus
static PHONE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9 ()\-]{7,20}$").expect("valid regex"));

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Required text must hold something besides whitespace
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("blank", "Must not be blank"))
    } else {
        Ok(())
    }
}

/// Program must be one of the fixed set
pub fn validate_program(program: &str) -> Result<(), ValidationError> {
    if constants::programs::ALL.contains(&program) {
        Ok(())
    } else {
        Err(error("program", "Unknown program"))
    }
}

/// Every listed program must be known
pub fn validate_programs(programs: &[String]) -> Result<(), ValidationError> {
    programs
        .iter()
        .try_for_each(|program| validate_program(program))
}

/// Event status must be one of the lifecycle values
pub fn validate_event_status(status: &str) -> Result<(), ValidationError> {
    EventStatus::from_str(status)
        .map(|_| ())
        .ok_or_else(|| error("status", "Status must be draft, published, closed or completed"))
}

pub fn validate_time_of_day(time: &str) -> Result<(), ValidationError> {
    if TIME_OF_DAY.is_match(time) {
        Ok(())
    } else {
        Err(error("time", "Time must be HH:MM"))
    }
}

pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    if phone.is_empty() || PHONE_NUMBER.is_match(phone) {
        Ok(())
    } else {
        Err(error("phone_number", "Invalid phone number"))
    }
}

/// Emails are matched case-insensitively everywhere
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Trim, and treat blank optional input as absent
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trim each entry and drop blanks
pub fn normalize_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
