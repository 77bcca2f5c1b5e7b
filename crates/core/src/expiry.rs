//! Contract expiry detection for synthesized feed items.

use chrono::{Duration, NaiveDate};

use crate::types::Timestamp;

/// Fixed lookahead window for `contract_expiring` items.
pub const EXPIRY_LOOKAHEAD_DAYS: i64 = 30;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Whole days until `end_at`, rounded up, if it falls inside the window.
///
/// Returns `None` for contracts already expired (or expiring exactly now)
/// and for contracts ending more than [`EXPIRY_LOOKAHEAD_DAYS`] out.
pub fn days_to_expiry(end_at: Timestamp, now: Timestamp) -> Option<i64> {
    let remaining = end_at - now;
    if remaining <= Duration::zero() || remaining > Duration::days(EXPIRY_LOOKAHEAD_DAYS) {
        return None;
    }
    let millis = remaining.num_milliseconds();
    Some((millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY)
}

/// Contract end dates are calendar dates; they expire at midnight UTC.
pub fn end_of_contract(end_date: NaiveDate) -> Timestamp {
    end_date.and_time(chrono::NaiveTime::MIN).and_utc()
}
