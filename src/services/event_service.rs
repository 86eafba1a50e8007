//! Event service

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    db::Store,
    error::{AppError, AppResult},
    handlers::events::{
        request::{CreateEventRequest, UpdateEventRequest},
        response::{CreatorSummary, EventResponse},
    },
    models::{EventChanges, EventDeletion, EventStatus, NewEvent},
    utils::validation::{normalize_list, normalize_optional},
};

/// Event service for business logic
pub struct EventService;

impl EventService {
    /// Create a new event in `draft`, owned by `admin_id`
    pub async fn create_event(
        store: &dyn Store,
        admin_id: &Uuid,
        payload: CreateEventRequest,
    ) -> AppResult<EventResponse> {
        let event = store
            .create_event(NewEvent {
                title: payload.title.trim().to_string(),
                description: payload.description.trim().to_string(),
                date: payload.date,
                start_time: payload.start_time,
                end_time: payload.end_time,
                location: payload.location.trim().to_string(),
                capacity: payload.capacity,
                image_url: normalize_optional(payload.image_url).unwrap_or_default(),
                tags: normalize_list(payload.tags.unwrap_or_default()),
                programs: normalize_list(payload.programs.unwrap_or_default()),
                created_by: *admin_id,
            })
            .await?;

        tracing::info!(event_id = %event.id, admin_id = %admin_id, "Event created");
        Self::with_creator(store, event.into()).await
    }

    /// Get event by ID
    pub async fn get_event(store: &dyn Store, id: &Uuid) -> AppResult<EventResponse> {
        let event = store
            .find_event(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        Self::with_creator(store, event.into()).await
    }

    /// All events by date, each with its creator
    pub async fn list_events(store: &dyn Store) -> AppResult<Vec<EventResponse>> {
        let events = store.list_events().await?;

        let mut creators: HashMap<Uuid, Option<CreatorSummary>> = HashMap::new();
        let mut responses = Vec::with_capacity(events.len());
        for event in events {
            let creator = match creators.get(&event.created_by) {
                Some(creator) => creator.clone(),
                None => {
                    let creator = store
                        .find_admin_by_id(&event.created_by)
                        .await?
                        .as_ref()
                        .map(CreatorSummary::from);
                    creators.insert(event.created_by, creator.clone());
                    creator
                }
            };
            responses.push(EventResponse::from(event).with_creator(creator));
        }

        Ok(responses)
    }

    /// Apply a partial update
    ///
    /// Capacity may be lowered below the current registration count; the
    /// event then simply reports itself full.
    pub async fn update_event(
        store: &dyn Store,
        id: &Uuid,
        payload: UpdateEventRequest,
    ) -> AppResult<EventResponse> {
        let status = payload
            .status
            .as_deref()
            .map(|s| {
                EventStatus::from_str(s)
                    .ok_or_else(|| AppError::Validation(format!("Invalid status: {}", s)))
            })
            .transpose()?;

        let changes = EventChanges {
            title: payload.title.map(|t| t.trim().to_string()),
            description: payload.description.map(|d| d.trim().to_string()),
            date: payload.date,
            start_time: payload.start_time,
            end_time: payload.end_time,
            location: payload.location.map(|l| l.trim().to_string()),
            capacity: payload.capacity,
            image_url: payload.image_url.map(|u| u.trim().to_string()),
            status,
            tags: payload.tags.map(normalize_list),
            programs: payload.programs.map(normalize_list),
        };

        let event = store
            .update_event(id, changes)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        tracing::info!(event_id = %event.id, status = %event.status, "Event updated");
        Self::with_creator(store, event.into()).await
    }

    /// Delete an event that has no registrations
    pub async fn delete_event(store: &dyn Store, id: &Uuid) -> AppResult<()> {
        match store.delete_event(id).await? {
            EventDeletion::Deleted => {
                tracing::info!(event_id = %id, "Event deleted");
                Ok(())
            }
            EventDeletion::NotFound => Err(AppError::NotFound("Event not found".to_string())),
            EventDeletion::HasRegistrations => Err(AppError::Conflict(
                "Event still has registrations; cancel them before deleting".to_string(),
            )),
        }
    }

    async fn with_creator(store: &dyn Store, response: EventResponse) -> AppResult<EventResponse> {
        let creator = store
            .find_admin_by_id(&response.created_by)
            .await?
            .as_ref()
            .map(CreatorSummary::from);

        Ok(response.with_creator(creator))
    }
}
