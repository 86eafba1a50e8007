//! Test utilities backed by testcontainers
//!
//! Every fixture call starts its own PostgreSQL container. Keep the returned
//! container alive for as long as the store is used.

use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use uuid::Uuid;

use crate::{
    constants::roles,
    db::{AdminStore, EventStore, PgStore, run_migrations},
    models::{Admin, Event, EventChanges, EventStatus, NewAdmin, NewEvent, NewRegistration},
};

/// Start PostgreSQL, run migrations and wrap the pool in a `PgStore`
pub async fn postgres_store() -> (ContainerAsync<Postgres>, PgStore) {
    let container = Postgres::default()
        .with_user("eventdesk")
        .with_password("eventdesk_test")
        .with_db_name("eventdesk_test")
        .with_tag("16-alpine")
        .start()
        .await
        .expect("Failed to start PostgreSQL container");

    let host = container.get_host().await.unwrap();
    let port = container.get_host_port_ipv4(5432).await.unwrap();
    let url = format!("postgres://eventdesk:eventdesk_test@{host}:{port}/eventdesk_test");

    let pool = PgPoolOptions::new()
        .max_connections(16)
        .connect(&url)
        .await
        .expect("Failed to connect to test database");
    run_migrations(&pool).await.expect("Failed to run migrations");

    (container, PgStore::new(pool))
}

pub async fn seed_admin(store: &PgStore) -> Admin {
    store
        .create_admin(NewAdmin {
            email: format!("{}@mues.ca", Uuid::new_v4().simple()),
            password_hash: "not-a-real-hash".to_string(),
            name: "Chair".to_string(),
            role: roles::ADMIN.to_string(),
        })
        .await
        .unwrap()
}

/// Insert an event and move it to `status`
pub async fn seed_event(
    store: &PgStore,
    admin_id: &Uuid,
    capacity: i32,
    status: EventStatus,
) -> Event {
    let event = store
        .create_event(NewEvent {
            title: "Resume Workshop".to_string(),
            description: "Bring a printed copy".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 11, 20).unwrap(),
            start_time: "18:00".to_string(),
            end_time: "20:00".to_string(),
            location: "ENG 103".to_string(),
            capacity,
            image_url: String::new(),
            tags: vec![],
            programs: vec![],
            created_by: *admin_id,
        })
        .await
        .unwrap();

    store
        .update_event(
            &event.id,
            EventChanges {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap()
}

/// A registration with a fresh check-in token
pub fn new_registration(event_id: &Uuid, email: &str) -> NewRegistration {
    NewRegistration {
        event_id: *event_id,
        student_email: email.to_string(),
        student_name: "Ada Lovelace".to_string(),
        program: "Computer Engineering".to_string(),
        student_number: None,
        phone_number: None,
        check_in_token: Uuid::new_v4().simple().to_string(),
    }
}
