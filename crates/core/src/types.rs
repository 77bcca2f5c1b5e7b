/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Monetary amounts in the smallest stable unit the source provides.
///
/// Sums are always accumulated in this unit; conversion to a display scale
/// happens once, as the last step of a report.
pub type MinorUnits = i64;
