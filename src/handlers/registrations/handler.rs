//! Registration handler implementations

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::{AuthenticatedAdmin, OptionalAuth},
    services::RegistrationService,
    state::AppState,
};

use super::{
    request::{CancelQuery, CheckInRequest, CreateRegistrationRequest},
    response::{
        CancelRegistrationResponse, CheckInResponse, RegistrationCreatedResponse,
        RegistrationResponse, StudentRegistrationResponse,
    },
};

/// Register a student for an event
pub async fn create_registration(
    State(state): State<AppState>,
    Json(payload): Json<CreateRegistrationRequest>,
) -> AppResult<(StatusCode, Json<RegistrationCreatedResponse>)> {
    payload.validate()?;

    let created = RegistrationService::register(state.store(), state.notifier(), payload).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// List registrations for an event
pub async fn list_event_registrations(
    State(state): State<AppState>,
    _auth_admin: AuthenticatedAdmin,
    Path(event_id): Path<Uuid>,
) -> AppResult<Json<Vec<RegistrationResponse>>> {
    let registrations = RegistrationService::list_for_event(state.store(), &event_id).await?;
    Ok(Json(registrations))
}

/// List a student's registrations
pub async fn list_student_registrations(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<Vec<StudentRegistrationResponse>>> {
    let registrations = RegistrationService::list_for_student(state.store(), &email).await?;
    Ok(Json(registrations))
}

/// Check a student in by scanned QR payload
pub async fn check_in(
    State(state): State<AppState>,
    auth_admin: AuthenticatedAdmin,
    Json(payload): Json<CheckInRequest>,
) -> AppResult<Json<CheckInResponse>> {
    payload.validate()?;

    tracing::debug!(admin_id = %auth_admin.id, "Processing check-in scan");
    let checked_in = RegistrationService::check_in(state.store(), &payload.qr_code).await?;

    Ok(Json(checked_in))
}

/// Cancel a registration
///
/// `DELETE /registrations/{id}` accepts either an admin bearer token or the
/// student's own address as `?email=`. A request carrying neither is
/// rejected with 401, and a mismatched email with 403.
pub async fn cancel_registration(
    State(state): State<AppState>,
    OptionalAuth(auth_admin): OptionalAuth,
    Path(id): Path<Uuid>,
    Query(query): Query<CancelQuery>,
) -> AppResult<Json<CancelRegistrationResponse>> {
    RegistrationService::cancel(
        state.store(),
        &id,
        auth_admin.is_some(),
        query.email.as_deref(),
    )
    .await?;

    Ok(Json(CancelRegistrationResponse {
        message: "Registration cancelled".to_string(),
    }))
}
