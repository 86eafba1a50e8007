//! Store traits
//!
//! Services talk to persistence only through these traits. Postgres
//! implementations live in `repositories`, the in-process one in `memory`.
//! Every mutation that touches the event counter is a single atomic
//! operation on the store side.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        Admin, CheckInOutcome, Event, EventChanges, EventDeletion, NewAdmin, NewEvent,
        NewRegistration, Registration, SeatReservation,
    },
};

/// Administrator persistence
#[async_trait]
pub trait AdminStore: Send + Sync {
    /// Insert a new admin. A taken email is `AppError::Conflict`.
    async fn create_admin(&self, admin: NewAdmin) -> AppResult<Admin>;

    async fn find_admin_by_id(&self, id: &Uuid) -> AppResult<Option<Admin>>;

    /// Lookup by (already lowercased) email
    async fn find_admin_by_email(&self, email: &str) -> AppResult<Option<Admin>>;
}

/// Event persistence
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Insert a new event in `draft` with a zero counter
    async fn create_event(&self, event: NewEvent) -> AppResult<Event>;

    async fn find_event(&self, id: &Uuid) -> AppResult<Option<Event>>;

    /// All events, soonest date first
    async fn list_events(&self) -> AppResult<Vec<Event>>;

    /// Apply a partial update; `None` if the event does not exist
    async fn update_event(&self, id: &Uuid, changes: EventChanges) -> AppResult<Option<Event>>;

    /// Delete an event unless registrations still reference it
    async fn delete_event(&self, id: &Uuid) -> AppResult<EventDeletion>;
}

/// Registration persistence
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    async fn find_registration(&self, id: &Uuid) -> AppResult<Option<Registration>>;

    async fn find_registration_for_student(
        &self,
        event_id: &Uuid,
        student_email: &str,
    ) -> AppResult<Option<Registration>>;

    async fn token_exists(&self, token: &str) -> AppResult<bool>;

    /// Registrations for one event, newest first
    async fn list_registrations_for_event(&self, event_id: &Uuid) -> AppResult<Vec<Registration>>;

    /// Registrations for one student email, newest first
    async fn list_registrations_for_student(
        &self,
        student_email: &str,
    ) -> AppResult<Vec<Registration>>;

    /// Atomically take a seat on a published, non-full event and insert the
    /// registration. Nothing is written unless the outcome is `Reserved`.
    async fn reserve_seat(&self, registration: NewRegistration) -> AppResult<SeatReservation>;

    /// Atomically flip the checked-in flag for the registration holding `token`
    async fn check_in(&self, token: &str, at: DateTime<Utc>) -> AppResult<CheckInOutcome>;

    /// Atomically delete a registration and release its seat (counter floored
    /// at zero). Returns the deleted row.
    async fn cancel_registration(&self, id: &Uuid) -> AppResult<Option<Registration>>;
}

/// Everything the services need from persistence
pub trait Store: AdminStore + EventStore + RegistrationStore {}

impl<T> Store for T where T: AdminStore + EventStore + RegistrationStore {}
