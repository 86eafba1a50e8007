//! In-process store
//!
//! Backs the test suite and `DATABASE_URL=memory://` demo runs. All state
//! sits behind one mutex, so each trait method is atomic by construction.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::store::{AdminStore, EventStore, RegistrationStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        Admin, CheckInOutcome, Event, EventChanges, EventDeletion, EventStatus, NewAdmin, NewEvent,
        NewRegistration, Registration, RegistrationStatus, SeatReservation,
    },
};

#[derive(Default)]
struct Inner {
    admins: HashMap<Uuid, Admin>,
    events: HashMap<Uuid, Event>,
    /// Insertion order doubles as creation order
    registrations: Vec<Registration>,
}

/// Mutex-guarded in-memory store
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdminStore for MemoryStore {
    async fn create_admin(&self, admin: NewAdmin) -> AppResult<Admin> {
        let mut inner = self.inner.lock().await;
        if inner.admins.values().any(|a| a.email == admin.email) {
            return Err(AppError::Conflict("Admin already exists".to_string()));
        }

        let now = Utc::now();
        let admin = Admin {
            id: Uuid::new_v4(),
            email: admin.email,
            password_hash: admin.password_hash,
            name: admin.name,
            role: admin.role,
            created_at: now,
            updated_at: now,
        };
        inner.admins.insert(admin.id, admin.clone());
        Ok(admin)
    }

    async fn find_admin_by_id(&self, id: &Uuid) -> AppResult<Option<Admin>> {
        Ok(self.inner.lock().await.admins.get(id).cloned())
    }

    async fn find_admin_by_email(&self, email: &str) -> AppResult<Option<Admin>> {
        let inner = self.inner.lock().await;
        Ok(inner.admins.values().find(|a| a.email == email).cloned())
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn create_event(&self, event: NewEvent) -> AppResult<Event> {
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            title: event.title,
            description: event.description,
            date: event.date,
            start_time: event.start_time,
            end_time: event.end_time,
            location: event.location,
            capacity: event.capacity,
            current_registrations: 0,
            image_url: event.image_url,
            status: EventStatus::Draft.as_str().to_string(),
            tags: event.tags,
            programs: event.programs,
            created_by: event.created_by,
            created_at: now,
            updated_at: now,
        };

        self.inner.lock().await.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn find_event(&self, id: &Uuid) -> AppResult<Option<Event>> {
        Ok(self.inner.lock().await.events.get(id).cloned())
    }

    async fn list_events(&self) -> AppResult<Vec<Event>> {
        let mut events: Vec<Event> = self.inner.lock().await.events.values().cloned().collect();
        events.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        Ok(events)
    }

    async fn update_event(&self, id: &Uuid, changes: EventChanges) -> AppResult<Option<Event>> {
        let mut inner = self.inner.lock().await;
        let Some(event) = inner.events.get_mut(id) else {
            return Ok(None);
        };

        changes.apply(event);
        event.updated_at = Utc::now();
        Ok(Some(event.clone()))
    }

    async fn delete_event(&self, id: &Uuid) -> AppResult<EventDeletion> {
        let mut inner = self.inner.lock().await;
        if !inner.events.contains_key(id) {
            return Ok(EventDeletion::NotFound);
        }
        if inner.registrations.iter().any(|r| r.event_id == *id) {
            return Ok(EventDeletion::HasRegistrations);
        }

        inner.events.remove(id);
        Ok(EventDeletion::Deleted)
    }
}

#[async_trait]
impl RegistrationStore for MemoryStore {
    async fn find_registration(&self, id: &Uuid) -> AppResult<Option<Registration>> {
        let inner = self.inner.lock().await;
        Ok(inner.registrations.iter().find(|r| r.id == *id).cloned())
    }

    async fn find_registration_for_student(
        &self,
        event_id: &Uuid,
        student_email: &str,
    ) -> AppResult<Option<Registration>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .registrations
            .iter()
            .find(|r| r.event_id == *event_id && r.student_email == student_email)
            .cloned())
    }

    async fn token_exists(&self, token: &str) -> AppResult<bool> {
        let inner = self.inner.lock().await;
        Ok(inner.registrations.iter().any(|r| r.check_in_token == token))
    }

    async fn list_registrations_for_event(&self, event_id: &Uuid) -> AppResult<Vec<Registration>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .registrations
            .iter()
            .rev()
            .filter(|r| r.event_id == *event_id)
            .cloned()
            .collect())
    }

    async fn list_registrations_for_student(
        &self,
        student_email: &str,
    ) -> AppResult<Vec<Registration>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .registrations
            .iter()
            .rev()
            .filter(|r| r.student_email == student_email)
            .cloned()
            .collect())
    }

    async fn reserve_seat(&self, registration: NewRegistration) -> AppResult<SeatReservation> {
        let mut inner = self.inner.lock().await;
        let Inner {
            events,
            registrations,
            ..
        } = &mut *inner;

        let Some(event) = events.get_mut(&registration.event_id) else {
            return Ok(SeatReservation::EventNotFound);
        };
        if !event.is_open_for_registration() {
            return Ok(SeatReservation::NotOpen);
        }
        if event.is_full() {
            return Ok(SeatReservation::Full);
        }
        if registrations.iter().any(|r| {
            r.event_id == registration.event_id && r.student_email == registration.student_email
        }) {
            return Ok(SeatReservation::Duplicate);
        }
        if registrations
            .iter()
            .any(|r| r.check_in_token == registration.check_in_token)
        {
            return Ok(SeatReservation::TokenTaken);
        }

        let now = Utc::now();
        event.current_registrations += 1;
        event.updated_at = now;

        let stored = Registration {
            id: Uuid::new_v4(),
            event_id: registration.event_id,
            student_email: registration.student_email,
            student_name: registration.student_name,
            program: registration.program,
            student_number: registration.student_number,
            phone_number: registration.phone_number,
            check_in_token: registration.check_in_token,
            checked_in: false,
            checked_in_at: None,
            status: RegistrationStatus::default().as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        registrations.push(stored.clone());

        Ok(SeatReservation::Reserved {
            registration: stored,
            event: event.clone(),
        })
    }

    async fn check_in(&self, token: &str, at: DateTime<Utc>) -> AppResult<CheckInOutcome> {
        let mut inner = self.inner.lock().await;
        let Some(registration) = inner
            .registrations
            .iter_mut()
            .find(|r| r.check_in_token == token)
        else {
            return Ok(CheckInOutcome::NotFound);
        };

        if registration.checked_in {
            return Ok(CheckInOutcome::AlreadyCheckedIn(registration.clone()));
        }

        registration.checked_in = true;
        registration.checked_in_at = Some(at);
        registration.updated_at = at;
        Ok(CheckInOutcome::CheckedIn(registration.clone()))
    }

    async fn cancel_registration(&self, id: &Uuid) -> AppResult<Option<Registration>> {
        let mut inner = self.inner.lock().await;
        let Some(index) = inner.registrations.iter().position(|r| r.id == *id) else {
            return Ok(None);
        };

        let removed = inner.registrations.remove(index);
        if let Some(event) = inner.events.get_mut(&removed.event_id) {
            event.current_registrations = (event.current_registrations - 1).max(0);
            event.updated_at = Utc::now();
        }

        Ok(Some(removed))
    }
}
