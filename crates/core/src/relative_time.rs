//! Relative-time labels for feed items ("3 hours ago", "Yesterday").
//!
//! Breakpoints are fixed: months are 30 days and years are 365 days.

use crate::types::Timestamp;

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: i64 = 24 * SECS_PER_HOUR;

const DAYS_PER_WEEK: i64 = 7;
const DAYS_PER_MONTH: i64 = 30;
const DAYS_PER_YEAR: i64 = 365;

/// Format `at` relative to `now`.
///
/// Timestamps in the future (clock skew between the store and this process)
/// are treated as "just now".
pub fn format_relative(at: Timestamp, now: Timestamp) -> String {
    let secs = (now - at).num_seconds();
    if secs < SECS_PER_MINUTE {
        return "just now".to_string();
    }

    let minutes = secs / SECS_PER_MINUTE;
    if minutes < 60 {
        return plural(minutes, "minute");
    }

    let hours = secs / SECS_PER_HOUR;
    if hours < 24 {
        return plural(hours, "hour");
    }

    let days = secs / SECS_PER_DAY;
    if days == 1 {
        return "Yesterday".to_string();
    }
    if days < DAYS_PER_WEEK {
        return format!("{days} days ago");
    }

    let weeks = days / DAYS_PER_WEEK;
    if weeks < 4 {
        return plural(weeks, "week");
    }

    // Days 28 and 29 have four whole weeks but no whole month yet.
    let months = (days / DAYS_PER_MONTH).max(1);
    if months < 12 {
        return plural(months, "month");
    }

    plural((days / DAYS_PER_YEAR).max(1), "year")
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}
