//! Calendar-month helpers for monthly quotas. All periods are UTC.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// True when `a` and `b` fall in the same calendar month of the same year.
pub fn same_month(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Label of the month containing `at`, e.g. `2026-10`.
pub fn period_label(at: DateTime<Utc>) -> String {
    at.format("%Y-%m").to_string()
}

/// Midnight UTC on the first day of the month after `at`.
pub fn next_month_start(at: DateTime<Utc>) -> DateTime<Utc> {
    let (year, month) = if at.month() == 12 {
        (at.year() + 1, 1)
    } else {
        (at.year(), at.month() + 1)
    };
    // Day 1 exists in every month, so this only fails past chrono's year range.
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
