//! Event model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Event database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    /// Wall-clock start, `HH:MM`
    pub start_time: String,
    /// Wall-clock end, `HH:MM`
    pub end_time: String,
    pub location: String,
    pub capacity: i32,
    pub current_registrations: i32,
    pub image_url: String,
    pub status: String,
    pub tags: Vec<String>,
    /// Eligible programs; empty means unrestricted
    pub programs: Vec<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn is_full(&self) -> bool {
        self.current_registrations >= self.capacity
    }

    pub fn spots_remaining(&self) -> i32 {
        self.capacity - self.current_registrations
    }

    /// Only published events take registrations
    pub fn is_open_for_registration(&self) -> bool {
        self.status == EventStatus::Published.as_str()
    }
}

/// Event lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Draft,
    Published,
    Closed,
    Completed,
}

impl EventStatus {
    pub const ALL: [EventStatus; 4] = [Self::Draft, Self::Published, Self::Closed, Self::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Closed => "closed",
            Self::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fields for a new event; the store fills in id, counter, status and timestamps
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub capacity: i32,
    pub image_url: String,
    pub tags: Vec<String>,
    pub programs: Vec<String>,
    pub created_by: Uuid,
}

/// Partial event update. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub image_url: Option<String>,
    pub status: Option<EventStatus>,
    pub tags: Option<Vec<String>>,
    pub programs: Option<Vec<String>>,
}

impl EventChanges {
    /// Apply the changes in place
    pub fn apply(self, event: &mut Event) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(start_time) = self.start_time {
            event.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            event.end_time = end_time;
        }
        if let Some(location) = self.location {
            event.location = location;
        }
        if let Some(capacity) = self.capacity {
            event.capacity = capacity;
        }
        if let Some(image_url) = self.image_url {
            event.image_url = image_url;
        }
        if let Some(status) = self.status {
            event.status = status.as_str().to_string();
        }
        if let Some(tags) = self.tags {
            event.tags = tags;
        }
        if let Some(programs) = self.programs {
            event.programs = programs;
        }
    }
}

/// Outcome of a guarded event deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDeletion {
    Deleted,
    NotFound,
    HasRegistrations,
}
