//! Daily activity log model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row per (user, calendar day) in `dailyActivityLogs`, keyed
/// deterministically as `{userId}_{date}`.
///
/// Steps and calories arrive in two separate sync passes and are merged
/// into the same document with field-masked writes, so neither pass
/// clobbers the other's value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivityLog {
    pub id: String,
    pub user_id: String,
    /// Calendar day in UTC, `YYYY-MM-DD`
    pub date: String,
    #[serde(default)]
    pub steps: i64,
    #[serde(default)]
    pub calories: f64,
    pub source: String,
    /// When the sync run wrote this row (RFC3339)
    pub synced_at: String,
    pub last_updated: String,
}

impl DailyActivityLog {
    pub const SOURCE_GOOGLE_FIT: &'static str = "google_fit";

    /// Deterministic document id for a user's day.
    pub fn doc_id(user_id: &str, date: &str) -> String {
        format!("{}_{}", user_id, date)
    }

    /// Row carrying a steps total for one day (calories untouched).
    pub fn steps_entry(user_id: &str, date: NaiveDate, steps: i64, now: &str) -> Self {
        Self::entry(user_id, date, steps, 0.0, now)
    }

    /// Row carrying a calories total for one day (steps untouched).
    pub fn calories_entry(user_id: &str, date: NaiveDate, calories: f64, now: &str) -> Self {
        Self::entry(user_id, date, 0, calories, now)
    }

    fn entry(user_id: &str, date: NaiveDate, steps: i64, calories: f64, now: &str) -> Self {
        let date = date.format("%Y-%m-%d").to_string();
        Self {
            id: Self::doc_id(user_id, &date),
            user_id: user_id.to_string(),
            date,
            steps,
            calories,
            source: Self::SOURCE_GOOGLE_FIT.to_string(),
            synced_at: now.to_string(),
            last_updated: now.to_string(),
        }
    }
}
