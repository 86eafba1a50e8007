//! Authentication request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::{
    constants::{MAX_NAME_LENGTH, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH},
    utils::validation::validate_not_blank,
};

/// Admin registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = MIN_PASSWORD_LENGTH, max = MAX_PASSWORD_LENGTH))]
    pub password: String,

    #[validate(
        length(min = 1, max = MAX_NAME_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
}

/// Admin login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}
