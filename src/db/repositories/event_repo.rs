//! Event repository

use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use crate::{
    db::store::EventStore,
    error::AppResult,
    models::{Event, EventChanges, EventDeletion, NewEvent},
};

#[async_trait]
impl EventStore for PgStore {
    async fn create_event(&self, event: NewEvent) -> AppResult<Event> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (
                title, description, date, start_time, end_time, location,
                capacity, image_url, tags, programs, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.start_time)
        .bind(&event.end_time)
        .bind(&event.location)
        .bind(event.capacity)
        .bind(&event.image_url)
        .bind(&event.tags)
        .bind(&event.programs)
        .bind(event.created_by)
        .fetch_one(self.pool())
        .await?;

        Ok(event)
    }

    async fn find_event(&self, id: &Uuid) -> AppResult<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(r#"SELECT * FROM events WHERE id = $1"#)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(event)
    }

    async fn list_events(&self) -> AppResult<Vec<Event>> {
        let events =
            sqlx::query_as::<_, Event>(r#"SELECT * FROM events ORDER BY date ASC, created_at ASC"#)
                .fetch_all(self.pool())
                .await?;

        Ok(events)
    }

    async fn update_event(&self, id: &Uuid, changes: EventChanges) -> AppResult<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                date = COALESCE($4, date),
                start_time = COALESCE($5, start_time),
                end_time = COALESCE($6, end_time),
                location = COALESCE($7, location),
                capacity = COALESCE($8, capacity),
                image_url = COALESCE($9, image_url),
                status = COALESCE($10, status),
                tags = COALESCE($11, tags),
                programs = COALESCE($12, programs),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.date)
        .bind(changes.start_time)
        .bind(changes.end_time)
        .bind(changes.location)
        .bind(changes.capacity)
        .bind(changes.image_url)
        .bind(changes.status.map(|s| s.as_str()))
        .bind(changes.tags)
        .bind(changes.programs)
        .fetch_optional(self.pool())
        .await?;

        Ok(event)
    }

    async fn delete_event(&self, id: &Uuid) -> AppResult<EventDeletion> {
        let result = sqlx::query(
            r#"
            DELETE FROM events
            WHERE id = $1
              AND NOT EXISTS (SELECT 1 FROM registrations WHERE event_id = $1)
            "#,
        )
        .bind(id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() > 0 {
            return Ok(EventDeletion::Deleted);
        }

        let exists: bool = sqlx::query_scalar(r#"SELECT EXISTS (SELECT 1 FROM events WHERE id = $1)"#)
            .bind(id)
            .fetch_one(self.pool())
            .await?;

        Ok(if exists {
            EventDeletion::HasRegistrations
        } else {
            EventDeletion::NotFound
        })
    }
}
