//! Registration service
//!
//! Registration, QR check-in and cancellation. Seat accounting happens
//! inside single store operations; this layer does the pre-checks that give
//! callers precise errors, then maps the store outcome onto the same errors
//! when a concurrent request got there first.

use futures::future::try_join_all;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    constants::MAX_TOKEN_ATTEMPTS,
    db::{RegistrationStore, Store},
    error::{AppError, AppResult},
    handlers::{
        events::EventResponse,
        registrations::{
            request::CreateRegistrationRequest,
            response::{
                CheckInResponse, CheckedInStudent, RegistrationCreatedResponse,
                RegistrationResponse, RegistrationSummary, StudentRegistrationResponse,
            },
        },
    },
    models::{CheckInOutcome, NewRegistration, Registration, SeatReservation},
    services::notification::{ConfirmationEmail, Notifier},
    utils::{
        generate_check_in_token, normalize_email, now_utc,
        qr::{self, QrImage},
        validation::normalize_optional,
    },
};

/// Registration service for business logic
pub struct RegistrationService;

impl RegistrationService {
    /// Register a student for a published event
    pub async fn register(
        store: &dyn Store,
        notifier: &dyn Notifier,
        payload: CreateRegistrationRequest,
    ) -> AppResult<RegistrationCreatedResponse> {
        Self::register_with(store, notifier, payload, generate_check_in_token).await
    }

    /// `register` with a caller-supplied token source
    pub async fn register_with(
        store: &dyn Store,
        notifier: &dyn Notifier,
        payload: CreateRegistrationRequest,
        mut next_token: impl FnMut() -> String + Send,
    ) -> AppResult<RegistrationCreatedResponse> {
        let student_email = normalize_email(&payload.student_email);
        let student_name = payload.student_name.trim().to_string();

        let event = store
            .find_event(&payload.event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        if !event.is_open_for_registration() {
            return Err(not_open());
        }
        if event.is_full() {
            return Err(AppError::CapacityExceeded);
        }
        if store
            .find_registration_for_student(&event.id, &student_email)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateRegistration);
        }

        let mut reserved = None;
        for attempt in 1..=MAX_TOKEN_ATTEMPTS {
            let token = next_token();
            if store.token_exists(&token).await? {
                warn!(attempt, "Check-in token collision, regenerating");
                continue;
            }

            let qr = render_qr(&token)?;

            let outcome = store
                .reserve_seat(NewRegistration {
                    event_id: event.id,
                    student_email: student_email.clone(),
                    student_name: student_name.clone(),
                    program: payload.program.clone(),
                    student_number: normalize_optional(payload.student_number.clone()),
                    phone_number: normalize_optional(payload.phone_number.clone()),
                    check_in_token: token,
                })
                .await?;

            match outcome {
                SeatReservation::Reserved {
                    registration,
                    event,
                } => {
                    reserved = Some((registration, event, qr));
                    break;
                }
                SeatReservation::TokenTaken => {
                    warn!(attempt, "Check-in token taken at insert, regenerating");
                }
                SeatReservation::EventNotFound => {
                    return Err(AppError::NotFound("Event not found".to_string()));
                }
                SeatReservation::NotOpen => return Err(not_open()),
                SeatReservation::Full => return Err(AppError::CapacityExceeded),
                SeatReservation::Duplicate => return Err(AppError::DuplicateRegistration),
            }
        }

        let Some((registration, event, qr)) = reserved else {
            return Err(AppError::Internal(anyhow::anyhow!(
                "Could not generate a unique check-in token after {} attempts",
                MAX_TOKEN_ATTEMPTS
            )));
        };

        info!(
            registration_id = %registration.id,
            event_id = %event.id,
            registrations = event.current_registrations,
            capacity = event.capacity,
            "Student registered"
        );

        let email = ConfirmationEmail {
            to: registration.student_email.clone(),
            student_name: registration.student_name.clone(),
            event_title: event.title.clone(),
            check_in_token: registration.check_in_token.clone(),
            qr_png: qr.png.clone(),
        };
        if let Err(e) = notifier.send_registration_confirmation(&email).await {
            warn!(
                registration_id = %registration.id,
                error = %e,
                "Confirmation email failed; registration kept"
            );
        }

        Ok(RegistrationCreatedResponse {
            message: "Registration successful! Check your email for confirmation.".to_string(),
            registration: RegistrationSummary {
                id: registration.id,
                event_id: registration.event_id,
                student_name: registration.student_name,
                student_email: registration.student_email,
                qr_code: qr.data_url(),
            },
        })
    }

    /// Mark the registration holding `token` as checked in
    pub async fn check_in(store: &dyn Store, token: &str) -> AppResult<CheckInResponse> {
        let registration = match store.check_in(token.trim(), now_utc()).await? {
            CheckInOutcome::CheckedIn(registration) => registration,
            CheckInOutcome::AlreadyCheckedIn(registration) => {
                return Err(AppError::AlreadyCheckedIn {
                    checked_in_at: registration
                        .checked_in_at
                        .unwrap_or(registration.updated_at),
                });
            }
            CheckInOutcome::NotFound => {
                return Err(AppError::NotFound("Invalid QR code".to_string()));
            }
        };

        let event_title = store
            .find_event(&registration.event_id)
            .await?
            .map(|event| event.title)
            .unwrap_or_default();

        info!(registration_id = %registration.id, "Student checked in");

        Ok(CheckInResponse {
            message: "Check-in successful!".to_string(),
            student: CheckedInStudent {
                name: registration.student_name,
                email: registration.student_email,
                program: registration.program,
                event: event_title,
                checked_in_at: registration.checked_in_at.unwrap_or(registration.updated_at),
            },
        })
    }

    /// Cancel a registration and release its seat
    ///
    /// Admins may cancel anything. Everyone else must name the student email
    /// the registration was made with.
    pub async fn cancel(
        store: &dyn Store,
        id: &Uuid,
        is_admin: bool,
        email: Option<&str>,
    ) -> AppResult<()> {
        let registration = store
            .find_registration(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Registration not found".to_string()))?;

        if !is_admin {
            authorize_student(&registration, email)?;
        }

        let cancelled = store
            .cancel_registration(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Registration not found".to_string()))?;

        info!(
            registration_id = %cancelled.id,
            event_id = %cancelled.event_id,
            by_admin = is_admin,
            "Registration cancelled"
        );
        Ok(())
    }

    /// Registrations for one event, newest first
    pub async fn list_for_event(
        store: &dyn Store,
        event_id: &Uuid,
    ) -> AppResult<Vec<RegistrationResponse>> {
        let registrations = store.list_registrations_for_event(event_id).await?;
        Ok(registrations.into_iter().map(Into::into).collect())
    }

    /// A student's registrations, newest first, each with its event
    pub async fn list_for_student(
        store: &dyn Store,
        email: &str,
    ) -> AppResult<Vec<StudentRegistrationResponse>> {
        let registrations = store
            .list_registrations_for_student(&normalize_email(email))
            .await?;

        let events = try_join_all(registrations.iter().map(|r| store.find_event(&r.event_id))).await?;

        Ok(registrations
            .into_iter()
            .zip(events)
            .map(|(registration, event)| StudentRegistrationResponse {
                registration: registration.into(),
                event: event.map(EventResponse::from),
            })
            .collect())
    }
}

fn not_open() -> AppError {
    AppError::InvalidState("Event is not open for registration".to_string())
}

fn render_qr(token: &str) -> AppResult<QrImage> {
    qr::render_png(token).map_err(|e| AppError::Internal(e.into()))
}

fn authorize_student(registration: &Registration, email: Option<&str>) -> AppResult<()> {
    match email.map(normalize_email) {
        None => Err(AppError::Unauthorized),
        Some(email) if email.is_empty() => Err(AppError::Unauthorized),
        Some(email) if email == registration.student_email => Ok(()),
        Some(_) => Err(AppError::Forbidden(
            "You can only cancel your own registration".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        db::{EventStore, MemoryStore},
        handlers::events::UpdateEventRequest,
        services::{
            EventService,
            event_service::tests::{admin, create_request, published_event},
            notification::{LogNotifier, MockNotifier, NotifyError},
        },
    };

    fn request(event_id: Uuid, email: &str) -> CreateRegistrationRequest {
        CreateRegistrationRequest {
            event_id,
            student_email: email.to_string(),
            student_name: "Ada Lovelace".to_string(),
            program: "Computer Engineering".to_string(),
            student_number: Some(" 500123456 ".to_string()),
            phone_number: None,
        }
    }

    fn quiet_notifier() -> MockNotifier {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_send_registration_confirmation()
            .returning(|_| Ok(()));
        notifier
    }

    async fn counter(store: &MemoryStore, event_id: &Uuid) -> i32 {
        store
            .find_event(event_id)
            .await
            .unwrap()
            .unwrap()
            .current_registrations
    }

    #[tokio::test]
    async fn test_register_returns_qr_and_notifies() {
        let store = MemoryStore::new();
        let owner = admin(&store).await;
        let event = published_event(&store, &owner.id, 10).await;

        let mut notifier = MockNotifier::new();
        notifier
            .expect_send_registration_confirmation()
            .withf(|email| {
                email.to == "ada@torontomu.ca"
                    && email.subject() == "Registration Confirmed: Resume Workshop"
                    && email.check_in_token.len() == 32
                    && !email.qr_png.is_empty()
            })
            .times(1)
            .returning(|_| Ok(()));

        let created =
            RegistrationService::register(&store, &notifier, request(event.id, " Ada@TorontoMU.ca "))
                .await
                .unwrap();

        assert_eq!(created.registration.event_id, event.id);
        assert_eq!(created.registration.student_email, "ada@torontomu.ca");
        assert!(created.registration.qr_code.starts_with("data:image/png;base64,"));
        assert_eq!(counter(&store, &event.id).await, 1);

        let stored = store.find_registration(&created.registration.id).await.unwrap().unwrap();
        assert_eq!(stored.student_number.as_deref(), Some("500123456"));
        assert_eq!(stored.status, "confirmed");
        assert!(!stored.checked_in);
        assert!(stored.checked_in_at.is_none());
        assert!(stored.check_in_token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_capacity_is_enforced() {
        let store = MemoryStore::new();
        let owner = admin(&store).await;
        let event = published_event(&store, &owner.id, 3).await;
        let notifier = quiet_notifier();

        for i in 0..3 {
            RegistrationService::register(&store, &notifier, request(event.id, &format!("s{i}@mu.ca")))
                .await
                .unwrap();
        }

        let err = RegistrationService::register(&store, &notifier, request(event.id, "late@mu.ca"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CapacityExceeded));
        assert_eq!(counter(&store, &event.id).await, 3);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_case_insensitive() {
        let store = MemoryStore::new();
        let owner = admin(&store).await;
        let event = published_event(&store, &owner.id, 10).await;
        let notifier = quiet_notifier();

        RegistrationService::register(&store, &notifier, request(event.id, "ada@torontomu.ca"))
            .await
            .unwrap();
        let err = RegistrationService::register(&store, &notifier, request(event.id, "ADA@torontomu.ca"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DuplicateRegistration));
        assert_eq!(counter(&store, &event.id).await, 1);
    }

    #[tokio::test]
    async fn test_unknown_event_and_draft_event() {
        let store = MemoryStore::new();
        let owner = admin(&store).await;
        let notifier = quiet_notifier();

        let err = RegistrationService::register(&store, &notifier, request(Uuid::new_v4(), "a@mu.ca"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let draft = EventService::create_event(&store, &owner.id, create_request(10))
            .await
            .unwrap();
        let err = RegistrationService::register(&store, &notifier, request(draft.id, "a@mu.ca"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidState(_)));
        assert_eq!(counter(&store, &draft.id).await, 0);
        assert!(store.list_registrations_for_event(&draft.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_check_in_is_one_way() {
        let store = MemoryStore::new();
        let owner = admin(&store).await;
        let event = published_event(&store, &owner.id, 10).await;
        let created =
            RegistrationService::register(&store, &quiet_notifier(), request(event.id, "ada@mu.ca"))
                .await
                .unwrap();
        let token = store
            .find_registration(&created.registration.id)
            .await
            .unwrap()
            .unwrap()
            .check_in_token;

        let first = RegistrationService::check_in(&store, &token).await.unwrap();
        assert_eq!(first.message, "Check-in successful!");
        assert_eq!(first.student.event, "Resume Workshop");
        assert_eq!(first.student.program, "Computer Engineering");

        for _ in 0..2 {
            match RegistrationService::check_in(&store, &token).await {
                Err(AppError::AlreadyCheckedIn { checked_in_at }) => {
                    assert_eq!(checked_in_at, first.student.checked_in_at)
                }
                other => panic!("expected AlreadyCheckedIn, got {other:?}"),
            }
        }

        let err = RegistrationService::check_in(&store, "deadbeef").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_single_seat_scenario() {
        let store = MemoryStore::new();
        let owner = admin(&store).await;
        let event = published_event(&store, &owner.id, 1).await;
        let notifier = quiet_notifier();

        let a = RegistrationService::register(&store, &notifier, request(event.id, "a@mu.ca"))
            .await
            .unwrap();
        let full = EventService::get_event(&store, &event.id).await.unwrap();
        assert_eq!(full.current_registrations, 1);
        assert!(full.is_full);

        let err = RegistrationService::register(&store, &notifier, request(event.id, "b@mu.ca"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CapacityExceeded));

        RegistrationService::cancel(&store, &a.registration.id, false, Some("A@mu.ca"))
            .await
            .unwrap();
        assert_eq!(counter(&store, &event.id).await, 0);

        RegistrationService::register(&store, &notifier, request(event.id, "b@mu.ca"))
            .await
            .unwrap();
        assert_eq!(counter(&store, &event.id).await, 1);
    }

    #[tokio::test]
    async fn test_cancel_then_reregister() {
        let store = MemoryStore::new();
        let owner = admin(&store).await;
        let event = published_event(&store, &owner.id, 5).await;
        let notifier = quiet_notifier();

        let first = RegistrationService::register(&store, &notifier, request(event.id, "a@mu.ca"))
            .await
            .unwrap();
        RegistrationService::cancel(&store, &first.registration.id, true, None)
            .await
            .unwrap();

        let second = RegistrationService::register(&store, &notifier, request(event.id, "a@mu.ca"))
            .await
            .unwrap();
        assert_ne!(first.registration.id, second.registration.id);
        assert_eq!(counter(&store, &event.id).await, 1);
    }

    #[tokio::test]
    async fn test_cancel_requires_proof() {
        let store = MemoryStore::new();
        let owner = admin(&store).await;
        let event = published_event(&store, &owner.id, 5).await;
        let created =
            RegistrationService::register(&store, &quiet_notifier(), request(event.id, "a@mu.ca"))
                .await
                .unwrap();
        let id = created.registration.id;

        let err = RegistrationService::cancel(&store, &id, false, None).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));

        let err = RegistrationService::cancel(&store, &id, false, Some("b@mu.ca"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(counter(&store, &event.id).await, 1);

        let err = RegistrationService::cancel(&store, &Uuid::new_v4(), true, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_program_round_trips_through_student_lookup() {
        let store = MemoryStore::new();
        let owner = admin(&store).await;
        let event = published_event(&store, &owner.id, 5).await;

        RegistrationService::register(&store, &quiet_notifier(), request(event.id, "ada@mu.ca"))
            .await
            .unwrap();

        let mine = RegistrationService::list_for_student(&store, "ADA@mu.ca").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].registration.program, "Computer Engineering");
        assert_eq!(mine[0].event.as_ref().unwrap().id, event.id);
    }

    #[tokio::test]
    async fn test_lists_are_newest_first() {
        let store = MemoryStore::new();
        let owner = admin(&store).await;
        let event = published_event(&store, &owner.id, 5).await;
        let notifier = quiet_notifier();

        for email in ["first@mu.ca", "second@mu.ca"] {
            RegistrationService::register(&store, &notifier, request(event.id, email))
                .await
                .unwrap();
        }

        let listed = RegistrationService::list_for_event(&store, &event.id).await.unwrap();
        let emails: Vec<_> = listed.iter().map(|r| r.student_email.as_str()).collect();
        assert_eq!(emails, ["second@mu.ca", "first@mu.ca"]);
    }

    #[tokio::test]
    async fn test_notification_failure_keeps_registration() {
        let store = MemoryStore::new();
        let owner = admin(&store).await;
        let event = published_event(&store, &owner.id, 5).await;

        let mut notifier = MockNotifier::new();
        notifier
            .expect_send_registration_confirmation()
            .times(1)
            .returning(|_| {
                Err(NotifyError::Rejected {
                    status: 500,
                    body: "mail provider down".to_string(),
                })
            });

        let created = RegistrationService::register(&store, &notifier, request(event.id, "a@mu.ca"))
            .await
            .unwrap();

        assert!(store.find_registration(&created.registration.id).await.unwrap().is_some());
        assert_eq!(counter(&store, &event.id).await, 1);
    }

    #[tokio::test]
    async fn test_token_collision_regenerates() {
        let store = MemoryStore::new();
        let owner = admin(&store).await;
        let event = published_event(&store, &owner.id, 5).await;
        let notifier = quiet_notifier();
        let taken = "a".repeat(32);

        let first = taken.clone();
        RegistrationService::register_with(&store, &notifier, request(event.id, "a@mu.ca"), move || {
            first.clone()
        })
        .await
        .unwrap();

        let mut tokens = vec!["b".repeat(32), taken.clone()];
        let created =
            RegistrationService::register_with(&store, &notifier, request(event.id, "b@mu.ca"), move || {
                tokens.pop().unwrap_or_default()
            })
            .await
            .unwrap();

        let stored = store.find_registration(&created.registration.id).await.unwrap().unwrap();
        assert_eq!(stored.check_in_token, "b".repeat(32));
    }

    #[tokio::test]
    async fn test_token_attempts_are_bounded() {
        let store = MemoryStore::new();
        let owner = admin(&store).await;
        let event = published_event(&store, &owner.id, 5).await;
        let notifier = quiet_notifier();
        let taken = "a".repeat(32);

        let first = taken.clone();
        RegistrationService::register_with(&store, &notifier, request(event.id, "a@mu.ca"), move || {
            first.clone()
        })
        .await
        .unwrap();

        let mut calls = 0;
        let err = RegistrationService::register_with(
            &store,
            &notifier,
            request(event.id, "b@mu.ca"),
            || {
                calls += 1;
                taken.clone()
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(calls, MAX_TOKEN_ATTEMPTS);
        assert_eq!(counter(&store, &event.id).await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_registrations_for_last_seat_admit_one() {
        let store = Arc::new(MemoryStore::new());
        let owner = admin(&store).await;
        let event = published_event(&store, &owner.id, 1).await;

        let attempts = (0..8).map(|i| {
            let store = Arc::clone(&store);
            let req = request(event.id, &format!("racer{i}@mu.ca"));
            tokio::spawn(async move {
                RegistrationService::register(store.as_ref(), &LogNotifier, req).await
            })
        });

        let results = futures::future::join_all(attempts).await;
        let admitted = results
            .iter()
            .filter(|r| matches!(r, Ok(Ok(_))))
            .count();
        let full = results
            .iter()
            .filter(|r| matches!(r, Ok(Err(AppError::CapacityExceeded))))
            .count();

        assert_eq!(admitted, 1);
        assert_eq!(full, 7);
        assert_eq!(counter(&store, &event.id).await, 1);
    }

    #[tokio::test]
    async fn test_closed_event_rejects_registration() {
        let store = MemoryStore::new();
        let owner = admin(&store).await;
        let event = published_event(&store, &owner.id, 5).await;
        EventService::update_event(
            &store,
            &event.id,
            UpdateEventRequest {
                status: Some("closed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let err = RegistrationService::register(&store, &quiet_notifier(), request(event.id, "a@mu.ca"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }
}
