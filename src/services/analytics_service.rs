//! Analytics service

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use futures::future::try_join_all;

use crate::{
    constants::ANALYTICS_TIMELINE_DAYS,
    db::Store,
    error::AppResult,
    handlers::analytics::response::{AnalyticsOverview, EventStats, TimelinePoint},
    models::{Event, Registration},
    utils::{now_utc, time::trailing_days},
};

/// Analytics service
pub struct AnalyticsService;

impl AnalyticsService {
    /// Build the dashboard overview
    ///
    /// Per-event registration reads run concurrently; any failure fails the
    /// whole overview.
    pub async fn overview(store: &dyn Store) -> AppResult<AnalyticsOverview> {
        let events = store.list_events().await?;

        let registrations = try_join_all(
            events
                .iter()
                .map(|event| store.list_registrations_for_event(&event.id)),
        )
        .await?;

        Ok(summarize(
            &events,
            &registrations,
            now_utc().date_naive(),
        ))
    }
}

/// Aggregate events and their registrations (same order) as of `today`
fn summarize(
    events: &[Event],
    registrations: &[Vec<Registration>],
    today: NaiveDate,
) -> AnalyticsOverview {
    let all: Vec<&Registration> = registrations.iter().flatten().collect();

    let total_registrations = all.len();
    let total_checked_in = all.iter().filter(|r| r.checked_in).count();

    let stats = events
        .iter()
        .zip(registrations)
        .map(|(event, regs)| EventStats {
            id: event.id,
            title: event.title.clone(),
            capacity: event.capacity,
            registrations: regs.len(),
            checked_in: regs.iter().filter(|r| r.checked_in).count(),
            fill_rate: fill_rate(regs.len(), event.capacity),
        })
        .collect();

    let mut program_breakdown = BTreeMap::new();
    for registration in &all {
        *program_breakdown
            .entry(registration.program.clone())
            .or_insert(0) += 1;
    }

    let mut per_day: HashMap<NaiveDate, usize> = HashMap::new();
    for registration in &all {
        *per_day.entry(registration.created_at.date_naive()).or_insert(0) += 1;
    }
    let registration_timeline = trailing_days(today, ANALYTICS_TIMELINE_DAYS)
        .into_iter()
        .map(|date| TimelinePoint {
            date,
            count: per_day.get(&date).copied().unwrap_or(0),
        })
        .collect();

    AnalyticsOverview {
        total_events: events.len(),
        total_registrations,
        total_checked_in,
        average_check_in_rate: percent(total_checked_in, total_registrations).round() as i64,
        events: stats,
        program_breakdown,
        registration_timeline,
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn fill_rate(registrations: usize, capacity: i32) -> f64 {
    let rate = percent(registrations, capacity.max(0) as usize);
    (rate * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::{
        db::MemoryStore,
        handlers::registrations::CreateRegistrationRequest,
        services::{
            RegistrationService,
            event_service::tests::{admin, published_event},
            notification::LogNotifier,
        },
    };

    fn event(title: &str, capacity: i32) -> Event {
        let now = Utc::now();
        Event {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: "desc".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 11, 20).unwrap(),
            start_time: "18:00".to_string(),
            end_time: "20:00".to_string(),
            location: "ENG 103".to_string(),
            capacity,
            current_registrations: 0,
            image_url: String::new(),
            status: "published".to_string(),
            tags: vec![],
            programs: vec![],
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    fn registration(event: &Event, program: &str, checked_in: bool, day: NaiveDate) -> Registration {
        let created_at = Utc.from_utc_datetime(&day.and_hms_opt(12, 0, 0).unwrap());
        Registration {
            id: Uuid::new_v4(),
            event_id: event.id,
            student_email: format!("{}@mu.ca", Uuid::new_v4()),
            student_name: "Student".to_string(),
            program: program.to_string(),
            student_number: None,
            phone_number: None,
            check_in_token: Uuid::new_v4().simple().to_string(),
            checked_in,
            checked_in_at: checked_in.then_some(created_at),
            status: "confirmed".to_string(),
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn test_summarize() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let yesterday = today - Duration::days(1);
        let long_ago = today - Duration::days(90);

        let workshop = event("Workshop", 3);
        let social = event("Social", 40);
        let registrations = vec![
            vec![
                registration(&workshop, "Computer Engineering", true, today),
                registration(&workshop, "Civil Engineering", false, yesterday),
            ],
            vec![registration(&social, "Computer Engineering", true, long_ago)],
        ];

        let overview = summarize(&[workshop.clone(), social], &registrations, today);

        assert_eq!(overview.total_events, 2);
        assert_eq!(overview.total_registrations, 3);
        assert_eq!(overview.total_checked_in, 2);
        assert_eq!(overview.average_check_in_rate, 67);

        assert_eq!(overview.events[0].id, workshop.id);
        assert_eq!(overview.events[0].registrations, 2);
        assert_eq!(overview.events[0].checked_in, 1);
        assert_eq!(overview.events[0].fill_rate, 66.7);
        assert_eq!(overview.events[1].fill_rate, 2.5);

        assert_eq!(overview.program_breakdown["Computer Engineering"], 2);
        assert_eq!(overview.program_breakdown["Civil Engineering"], 1);

        let timeline = &overview.registration_timeline;
        assert_eq!(timeline.len(), 30);
        assert_eq!(timeline[0].date, today - Duration::days(29));
        assert_eq!(timeline[28], TimelinePoint { date: yesterday, count: 1 });
        assert_eq!(timeline[29], TimelinePoint { date: today, count: 1 });
        assert_eq!(timeline.iter().map(|p| p.count).sum::<usize>(), 2);
    }

    #[test]
    fn test_summarize_empty() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let overview = summarize(&[], &[], today);

        assert_eq!(overview.total_events, 0);
        assert_eq!(overview.average_check_in_rate, 0);
        assert!(overview.program_breakdown.is_empty());
        assert!(overview.registration_timeline.iter().all(|p| p.count == 0));
    }

    #[tokio::test]
    async fn test_overview_reads_store() {
        let store = MemoryStore::new();
        let owner = admin(&store).await;
        let event = published_event(&store, &owner.id, 4).await;

        RegistrationService::register(
            &store,
            &LogNotifier,
            CreateRegistrationRequest {
                event_id: event.id,
                student_email: "ada@mu.ca".to_string(),
                student_name: "Ada".to_string(),
                program: "Electrical Engineering".to_string(),
                student_number: None,
                phone_number: None,
            },
        )
        .await
        .unwrap();

        let overview = AnalyticsService::overview(&store).await.unwrap();
        assert_eq!(overview.total_events, 1);
        assert_eq!(overview.total_registrations, 1);
        assert_eq!(overview.events[0].fill_rate, 25.0);
        assert_eq!(overview.program_breakdown["Electrical Engineering"], 1);
        assert_eq!(overview.registration_timeline.last().unwrap().count, 1);
    }
}
