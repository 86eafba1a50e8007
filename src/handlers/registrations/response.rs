//! Registration response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{handlers::events::EventResponse, models::Registration};

/// Result of a successful registration
#[derive(Debug, Serialize)]
pub struct RegistrationCreatedResponse {
    pub message: String,
    pub registration: RegistrationSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSummary {
    pub id: Uuid,
    pub event_id: Uuid,
    pub student_name: String,
    pub student_email: String,
    /// `data:image/png;base64,...`
    pub qr_code: String,
}

/// Stored registration as returned to admins and students
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub id: Uuid,
    pub event_id: Uuid,
    pub student_email: String,
    pub student_name: String,
    pub program: String,
    pub student_number: Option<String>,
    pub phone_number: Option<String>,
    /// The raw check-in token
    pub qr_code: String,
    pub checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Registration> for RegistrationResponse {
    fn from(r: Registration) -> Self {
        Self {
            id: r.id,
            event_id: r.event_id,
            student_email: r.student_email,
            student_name: r.student_name,
            program: r.program,
            student_number: r.student_number,
            phone_number: r.phone_number,
            qr_code: r.check_in_token,
            checked_in: r.checked_in,
            checked_in_at: r.checked_in_at,
            status: r.status,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// A student's registration with its event populated
#[derive(Debug, Serialize)]
pub struct StudentRegistrationResponse {
    #[serde(flatten)]
    pub registration: RegistrationResponse,
    /// `None` only if the event row disappeared underneath the registration
    pub event: Option<EventResponse>,
}

/// Result of a successful scan
#[derive(Debug, Serialize)]
pub struct CheckInResponse {
    pub message: String,
    pub student: CheckedInStudent,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckedInStudent {
    pub name: String,
    pub email: String,
    pub program: String,
    /// Event title
    pub event: String,
    pub checked_in_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CancelRegistrationResponse {
    pub message: String,
}
