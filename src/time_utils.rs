// SPDX-License-Identifier: MIT

//! Shared helpers for date/time formatting and calendar-month math.

use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, Utc};

/// English full month names, as stored in leaderboard document ids.
/// Matching is case-sensitive and exact.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// 1-based month number for a full English month name.
pub fn month_index(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|m| *m == name)
        .map(|i| i as u32 + 1)
}

/// Inclusive first/last calendar day of a month as `YYYY-MM-DD` strings.
///
/// Returns `None` for an unrecognized month name; callers reject that as
/// a bad request rather than computing a garbage range.
pub fn month_range(name: &str, year: i32) -> Option<(String, String)> {
    let month = month_index(name)?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let last = next_first.pred_opt()?;
    Some((
        first.format("%Y-%m-%d").to_string(),
        last.format("%Y-%m-%d").to_string(),
    ))
}

/// Full English name of the current month plus the year, in UTC.
/// Used by the scheduled run, which defaults to the current calendar month.
pub fn current_month_year(now: DateTime<Utc>) -> (String, i32) {
    let name = MONTH_NAMES[(now.month0()) as usize].to_string();
    (name, now.year())
}

/// Time until the next daily tick at `hour` UTC (exclusive of `now` itself).
pub fn duration_until_next_tick(now: DateTime<Utc>, hour: u32) -> std::time::Duration {
    let hour = hour.min(23);
    let tick = now
        .date_naive()
        .and_hms_opt(hour, 0, 0)
        .map(|t| t.and_utc())
        .unwrap_or(now);
    let next = if tick > now {
        tick
    } else {
        tick + chrono::Duration::days(1)
    };
    (next - now).to_std().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_month_index_exact_match() {
        assert_eq!(month_index("January"), Some(1));
        assert_eq!(month_index("March"), Some(3));
        assert_eq!(month_index("December"), Some(12));
        // Case-sensitive, full names only
        assert_eq!(month_index("march"), None);
        assert_eq!(month_index("Mar"), None);
        assert_eq!(month_index(""), None);
    }

    #[test]
    fn test_month_range_regular_month() {
        assert_eq!(
            month_range("March", 2024),
            Some(("2024-03-01".to_string(), "2024-03-31".to_string()))
        );
        assert_eq!(
            month_range("April", 2024),
            Some(("2024-04-01".to_string(), "2024-04-30".to_string()))
        );
    }

    #[test]
    fn test_month_range_leap_february() {
        assert_eq!(
            month_range("February", 2024),
            Some(("2024-02-01".to_string(), "2024-02-29".to_string()))
        );
        assert_eq!(
            month_range("February", 2023),
            Some(("2023-02-01".to_string(), "2023-02-28".to_string()))
        );
    }

    #[test]
    fn test_month_range_december_wraps_year() {
        assert_eq!(
            month_range("December", 2024),
            Some(("2024-12-01".to_string(), "2024-12-31".to_string()))
        );
    }

    #[test]
    fn test_month_range_invalid_name() {
        assert_eq!(month_range("Smarch", 2024), None);
    }

    #[test]
    fn test_current_month_year() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 8, 30, 0).unwrap();
        assert_eq!(current_month_year(now), ("March".to_string(), 2024));
    }

    #[test]
    fn test_duration_until_next_tick_same_day() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 8, 0, 0).unwrap();
        let wait = duration_until_next_tick(now, 12);
        assert_eq!(wait.as_secs(), 4 * 3600);
    }

    #[test]
    fn test_duration_until_next_tick_rolls_to_tomorrow() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let wait = duration_until_next_tick(now, 12);
        assert_eq!(wait.as_secs(), 24 * 3600);

        let later = Utc.with_ymd_and_hms(2024, 3, 15, 18, 30, 0).unwrap();
        let wait = duration_until_next_tick(later, 12);
        assert_eq!(wait.as_secs(), 17 * 3600 + 1800);
    }
}
