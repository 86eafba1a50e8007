//! Registration request DTOs

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::MAX_STUDENT_NAME_LENGTH,
    utils::validation::{validate_not_blank, validate_phone_number, validate_program},
};

/// Student registration request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegistrationRequest {
    pub event_id: Uuid,

    #[validate(email)]
    pub student_email: String,

    #[validate(
        length(min = 1, max = MAX_STUDENT_NAME_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub student_name: String,

    #[validate(custom(function = "validate_program"))]
    pub program: String,

    pub student_number: Option<String>,

    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: Option<String>,
}

/// Check-in scan; the QR payload is the raw token
#[derive(Debug, Deserialize, Validate)]
pub struct CheckInRequest {
    #[serde(rename = "qrCode")]
    #[validate(length(min = 1))]
    pub qr_code: String,
}

/// Cancellation proof for callers without an admin token
#[derive(Debug, Default, Deserialize)]
pub struct CancelQuery {
    pub email: Option<String>,
}
