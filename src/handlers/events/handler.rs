//! Event handler implementations

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult, middleware::AuthenticatedAdmin, services::EventService, state::AppState,
};

use super::{
    request::{CreateEventRequest, UpdateEventRequest},
    response::{DeleteEventResponse, EventResponse},
};

/// List all events
pub async fn list_events(State(state): State<AppState>) -> AppResult<Json<Vec<EventResponse>>> {
    let events = EventService::list_events(state.store()).await?;
    Ok(Json(events))
}

/// Create a new event
pub async fn create_event(
    State(state): State<AppState>,
    auth_admin: AuthenticatedAdmin,
    Json(payload): Json<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<EventResponse>)> {
    payload.validate()?;

    let event = EventService::create_event(state.store(), &auth_admin.id, payload).await?;

    Ok((StatusCode::CREATED, Json(event)))
}

/// Get a specific event
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EventResponse>> {
    let event = EventService::get_event(state.store(), &id).await?;
    Ok(Json(event))
}

/// Update an event
pub async fn update_event(
    State(state): State<AppState>,
    _auth_admin: AuthenticatedAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEventRequest>,
) -> AppResult<Json<EventResponse>> {
    payload.validate()?;

    let event = EventService::update_event(state.store(), &id, payload).await?;

    Ok(Json(event))
}

/// Delete an event
pub async fn delete_event(
    State(state): State<AppState>,
    _auth_admin: AuthenticatedAdmin,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeleteEventResponse>> {
    EventService::delete_event(state.store(), &id).await?;

    Ok(Json(DeleteEventResponse {
        message: "Event deleted successfully".to_string(),
    }))
}
