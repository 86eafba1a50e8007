//! Time utilities

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Get current UTC time
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// The `days` UTC calendar days ending at `today`, oldest first
pub fn trailing_days(today: NaiveDate, days: i64) -> Vec<NaiveDate> {
    (0..days)
        .rev()
        .map(|offset| today - Duration::days(offset))
        .collect()
}
