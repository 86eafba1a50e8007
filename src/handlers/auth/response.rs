//! Authentication response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::Admin;

/// Login response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
    pub admin: AdminResponse,
}

/// Admin profile; never includes the password hash
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<Admin> for AdminResponse {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            email: admin.email,
            name: admin.name,
            role: admin.role,
            created_at: admin.created_at,
        }
    }
}

/// Registration success response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub admin: AdminResponse,
}

/// Current admin response (for /me endpoint)
#[derive(Debug, Serialize)]
pub struct CurrentAdminResponse {
    pub admin: AdminResponse,
}
