//! Activity log models (append-only).
//!
//! Rows have no `updated_at`: an entry is immutable once written.

use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use vendorhub_core::activity::{ActivityDetails, ActivityType, SubjectRef};
use vendorhub_core::error::CoreError;
use vendorhub_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Stored row
// ---------------------------------------------------------------------------

/// A raw row from `activity_logs`.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityLogRow {
    pub id: DbId,
    pub created_at: Timestamp,
    pub activity_type: String,
    pub description: String,
    pub actor_id: Option<DbId>,
    pub subjects: Json<Vec<SubjectRef>>,
    pub metadata: serde_json::Value,
}

/// A decoded activity log entry.
///
/// Serializes with the typed details flattened in, so clients see
/// `activity_type` and `metadata` as top-level fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityLogEntry {
    pub id: DbId,
    pub created_at: Timestamp,
    pub description: String,
    pub actor_id: Option<DbId>,
    pub subjects: Vec<SubjectRef>,
    #[serde(flatten)]
    pub details: ActivityDetails,
}

impl ActivityLogEntry {
    pub fn activity_type(&self) -> ActivityType {
        self.details.activity_type()
    }
}

impl TryFrom<ActivityLogRow> for ActivityLogEntry {
    type Error = CoreError;

    fn try_from(row: ActivityLogRow) -> Result<Self, Self::Error> {
        let details = ActivityDetails::from_columns(&row.activity_type, row.metadata)?;
        Ok(Self {
            id: row.id,
            created_at: row.created_at,
            description: row.description,
            actor_id: row.actor_id,
            subjects: row.subjects.0,
            details,
        })
    }
}

// ---------------------------------------------------------------------------
// Insert DTO
// ---------------------------------------------------------------------------

/// Column values for one new `activity_logs` row.
///
/// `created_at` is always assigned by the store.
#[derive(Debug, Clone)]
pub struct NewActivityLog {
    pub activity_type: ActivityType,
    pub description: String,
    pub actor_id: Option<DbId>,
    pub subjects: Vec<SubjectRef>,
    pub metadata: serde_json::Value,
}

impl NewActivityLog {
    /// Build a row from typed details, rendering the description once.
    pub fn from_details(
        details: &ActivityDetails,
        actor_id: Option<DbId>,
        subjects: Vec<SubjectRef>,
    ) -> Result<Self, CoreError> {
        let (activity_type, metadata) = details.to_columns()?;
        Ok(Self {
            activity_type,
            description: details.describe(),
            actor_id,
            subjects,
            metadata,
        })
    }
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Filter parameters for querying the activity log.
#[derive(Debug, Clone, Default)]
pub struct ActivityLogQuery {
    pub activity_type: Option<ActivityType>,
    pub actor_id: Option<DbId>,
    /// Only entries referencing this subject (both fields required).
    pub subject: Option<SubjectRef>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Paginated response for activity log queries.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityLogPage {
    pub items: Vec<ActivityLogEntry>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use vendorhub_core::activity::EntityKind;

    #[test]
    fn new_row_renders_description_and_splits_columns() {
        let details = ActivityDetails::EntityCreated {
            entity: EntityKind::Vendor,
            name: "Acme".into(),
        };
        let row = NewActivityLog::from_details(&details, Some(3), vec![SubjectRef::vendor(9)])
            .unwrap();
        assert_eq!(row.activity_type, ActivityType::EntityCreated);
        assert_eq!(row.description, "New vendor added: Acme");
        assert_eq!(row.metadata["name"], "Acme");
    }

    #[test]
    fn entry_serializes_flat() {
        let entry = ActivityLogEntry {
            id: 1,
            created_at: chrono::Utc::now(),
            description: "User signed in".into(),
            actor_id: Some(2),
            subjects: vec![],
            details: ActivityDetails::UserSignedIn {},
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["activity_type"], "user_signed_in");
        assert_eq!(json["metadata"], serde_json::json!({}));
    }

    #[test]
    fn row_with_unknown_tag_fails_to_decode() {
        let row = ActivityLogRow {
            id: 1,
            created_at: chrono::Utc::now(),
            activity_type: "vendor_exploded".into(),
            description: String::new(),
            actor_id: None,
            subjects: Json(vec![]),
            metadata: serde_json::json!({}),
        };
        assert!(ActivityLogEntry::try_from(row).is_err());
    }
}
