//! Registration model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Event;

/// Registration database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: Uuid,
    pub event_id: Uuid,
    /// Always stored trimmed and lowercased
    pub student_email: String,
    pub student_name: String,
    pub program: String,
    pub student_number: Option<String>,
    pub phone_number: Option<String>,
    /// Opaque token encoded in the QR code
    pub check_in_token: String,
    pub checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration status. Cancellation deletes the row, so stored rows are `confirmed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Pending,
    #[default]
    Confirmed,
    Cancelled,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Fields for a new registration
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub event_id: Uuid,
    pub student_email: String,
    pub student_name: String,
    pub program: String,
    pub student_number: Option<String>,
    pub phone_number: Option<String>,
    pub check_in_token: String,
}

/// Outcome of the atomic "take a seat and insert" store operation
#[derive(Debug, Clone)]
pub enum SeatReservation {
    /// Registration stored; carries the event with its incremented counter
    Reserved {
        registration: Registration,
        event: Event,
    },
    EventNotFound,
    NotOpen,
    Full,
    Duplicate,
    /// The check-in token collided with an existing one
    TokenTaken,
}

/// Outcome of the atomic check-in store operation
#[derive(Debug, Clone)]
pub enum CheckInOutcome {
    CheckedIn(Registration),
    AlreadyCheckedIn(Registration),
    NotFound,
}
