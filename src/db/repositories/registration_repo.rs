//! Registration repository
//!
//! Seat reservation, check-in and cancellation each run as one transaction
//! with conditional statements, so the event counter cannot drift past
//! capacity or below zero under concurrent requests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::PgStore;
use crate::{
    db::store::RegistrationStore,
    error::AppResult,
    models::{
        CheckInOutcome, Event, NewRegistration, Registration, RegistrationStatus, SeatReservation,
    },
};

/// Unique constraint on the check-in token (see migrations)
const TOKEN_CONSTRAINT: &str = "uq_registrations_check_in_token";

#[async_trait]
impl RegistrationStore for PgStore {
    async fn find_registration(&self, id: &Uuid) -> AppResult<Option<Registration>> {
        let registration =
            sqlx::query_as::<_, Registration>(r#"SELECT * FROM registrations WHERE id = $1"#)
                .bind(id)
                .fetch_optional(self.pool())
                .await?;

        Ok(registration)
    }

    async fn find_registration_for_student(
        &self,
        event_id: &Uuid,
        student_email: &str,
    ) -> AppResult<Option<Registration>> {
        let registration = sqlx::query_as::<_, Registration>(
            r#"SELECT * FROM registrations WHERE event_id = $1 AND student_email = $2"#,
        )
        .bind(event_id)
        .bind(student_email)
        .fetch_optional(self.pool())
        .await?;

        Ok(registration)
    }

    async fn token_exists(&self, token: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"SELECT EXISTS (SELECT 1 FROM registrations WHERE check_in_token = $1)"#,
        )
        .bind(token)
        .fetch_one(self.pool())
        .await?;

        Ok(exists)
    }

    async fn list_registrations_for_event(&self, event_id: &Uuid) -> AppResult<Vec<Registration>> {
        let registrations = sqlx::query_as::<_, Registration>(
            r#"SELECT * FROM registrations WHERE event_id = $1 ORDER BY created_at DESC"#,
        )
        .bind(event_id)
        .fetch_all(self.pool())
        .await?;

        Ok(registrations)
    }

    async fn list_registrations_for_student(
        &self,
        student_email: &str,
    ) -> AppResult<Vec<Registration>> {
        let registrations = sqlx::query_as::<_, Registration>(
            r#"SELECT * FROM registrations WHERE student_email = $1 ORDER BY created_at DESC"#,
        )
        .bind(student_email)
        .fetch_all(self.pool())
        .await?;

        Ok(registrations)
    }

    async fn reserve_seat(&self, registration: NewRegistration) -> AppResult<SeatReservation> {
        let mut tx = self.pool().begin().await?;

        // The row lock taken here serializes concurrent reservations per event
        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET current_registrations = current_registrations + 1, updated_at = NOW()
            WHERE id = $1
              AND status = 'published'
              AND current_registrations < capacity
            RETURNING *
            "#,
        )
        .bind(registration.event_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(event) = event else {
            tx.rollback().await?;
            return self.classify_rejected_reservation(&registration.event_id).await;
        };

        let inserted = sqlx::query_as::<_, Registration>(
            r#"
            INSERT INTO registrations (
                event_id, student_email, student_name, program,
                student_number, phone_number, check_in_token, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(registration.event_id)
        .bind(&registration.student_email)
        .bind(&registration.student_name)
        .bind(&registration.program)
        .bind(&registration.student_number)
        .bind(&registration.phone_number)
        .bind(&registration.check_in_token)
        .bind(RegistrationStatus::default().as_str())
        .fetch_one(&mut *tx)
        .await;

        match inserted {
            Ok(stored) => {
                tx.commit().await?;
                Ok(SeatReservation::Reserved {
                    registration: stored,
                    event,
                })
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                let token_clash = db_err.constraint() == Some(TOKEN_CONSTRAINT);
                tx.rollback().await?;
                Ok(if token_clash {
                    SeatReservation::TokenTaken
                } else {
                    SeatReservation::Duplicate
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn check_in(&self, token: &str, at: DateTime<Utc>) -> AppResult<CheckInOutcome> {
        let updated = sqlx::query_as::<_, Registration>(
            r#"
            UPDATE registrations
            SET checked_in = TRUE, checked_in_at = $2, updated_at = $2
            WHERE check_in_token = $1 AND checked_in = FALSE
            RETURNING *
            "#,
        )
        .bind(token)
        .bind(at)
        .fetch_optional(self.pool())
        .await?;

        if let Some(registration) = updated {
            return Ok(CheckInOutcome::CheckedIn(registration));
        }

        let existing = sqlx::query_as::<_, Registration>(
            r#"SELECT * FROM registrations WHERE check_in_token = $1"#,
        )
        .bind(token)
        .fetch_optional(self.pool())
        .await?;

        Ok(match existing {
            Some(registration) => CheckInOutcome::AlreadyCheckedIn(registration),
            None => CheckInOutcome::NotFound,
        })
    }

    async fn cancel_registration(&self, id: &Uuid) -> AppResult<Option<Registration>> {
        let mut tx = self.pool().begin().await?;

        let removed = sqlx::query_as::<_, Registration>(
            r#"DELETE FROM registrations WHERE id = $1 RETURNING *"#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(registration) = &removed {
            sqlx::query(
                r#"
                UPDATE events
                SET current_registrations = GREATEST(current_registrations - 1, 0),
                    updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(registration.event_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(removed)
    }
}

impl PgStore {
    /// Work out why the conditional seat update matched no row
    async fn classify_rejected_reservation(&self, event_id: &Uuid) -> AppResult<SeatReservation> {
        let event = sqlx::query_as::<_, Event>(r#"SELECT * FROM events WHERE id = $1"#)
            .bind(event_id)
            .fetch_optional(self.pool())
            .await?;

        Ok(match event {
            None => SeatReservation::EventNotFound,
            Some(event) if !event.is_open_for_registration() => SeatReservation::NotOpen,
            Some(_) => SeatReservation::Full,
        })
    }
}
