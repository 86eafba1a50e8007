//! Analytics response DTOs

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

/// Dashboard overview across all events
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsOverview {
    pub total_events: usize,
    pub total_registrations: usize,
    pub total_checked_in: usize,
    /// Percent, rounded to a whole number
    pub average_check_in_rate: i64,
    pub events: Vec<EventStats>,
    /// Program name to registration count
    pub program_breakdown: BTreeMap<String, usize>,
    /// One entry per day, oldest first
    pub registration_timeline: Vec<TimelinePoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    pub id: Uuid,
    pub title: String,
    pub capacity: i32,
    pub registrations: usize,
    pub checked_in: usize,
    /// Percent of capacity, one decimal place
    pub fill_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub count: usize,
}
