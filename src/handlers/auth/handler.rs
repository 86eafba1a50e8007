//! Authentication handler implementations

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    middleware::AuthenticatedAdmin,
    services::AuthService,
    state::AppState,
};

use super::{
    request::{LoginRequest, RegisterRequest},
    response::{AuthResponse, CurrentAdminResponse, RegisterResponse},
};

/// Register a new administrator
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    payload.validate()?;

    let admin = AuthService::register(
        state.store(),
        &payload.email,
        &payload.password,
        &payload.name,
    )
    .await?;

    let response = RegisterResponse {
        message: "Admin registered successfully".to_string(),
        admin: admin.into(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    payload.validate()?;

    let (admin, token, expires_in) = AuthService::login(
        state.store(),
        &state.config().jwt,
        &payload.email,
        &payload.password,
    )
    .await?;

    Ok(Json(AuthResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in,
        admin: admin.into(),
    }))
}

/// Get the authenticated administrator
pub async fn get_current_admin(
    State(state): State<AppState>,
    auth_admin: AuthenticatedAdmin,
) -> AppResult<Json<CurrentAdminResponse>> {
    let admin = state
        .store()
        .find_admin_by_id(&auth_admin.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))?;

    Ok(Json(CurrentAdminResponse {
        admin: admin.into(),
    }))
}
