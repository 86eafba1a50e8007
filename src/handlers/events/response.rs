//! Event response DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Admin, Event};

/// Creating administrator, as embedded in event listings
#[derive(Debug, Clone, Serialize)]
pub struct CreatorSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&Admin> for CreatorSummary {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            name: admin.name.clone(),
            email: admin.email.clone(),
        }
    }
}

/// Event with its derived capacity fields
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub capacity: i32,
    pub current_registrations: i32,
    pub is_full: bool,
    pub spots_remaining: i32,
    pub image_url: String,
    pub status: String,
    pub tags: Vec<String>,
    pub programs: Vec<String>,
    pub created_by: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<CreatorSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventResponse {
    pub fn with_creator(mut self, creator: Option<CreatorSummary>) -> Self {
        self.creator = creator;
        self
    }
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            is_full: event.is_full(),
            spots_remaining: event.spots_remaining(),
            id: event.id,
            title: event.title,
            description: event.description,
            date: event.date,
            start_time: event.start_time,
            end_time: event.end_time,
            location: event.location,
            capacity: event.capacity,
            current_registrations: event.current_registrations,
            image_url: event.image_url,
            status: event.status,
            tags: event.tags,
            programs: event.programs,
            created_by: event.created_by,
            creator: None,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

/// Delete confirmation
#[derive(Debug, Serialize)]
pub struct DeleteEventResponse {
    pub message: String,
}
