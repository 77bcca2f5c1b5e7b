//! Append-only activity recording.

use std::time::Duration;

use vendorhub_core::activity::{validate_new_activity, ActivityDetails, SubjectRef};
use vendorhub_core::types::DbId;
use vendorhub_db::models::activity::{ActivityLogEntry, NewActivityLog};
use vendorhub_db::repositories::ActivityLogRepo;
use vendorhub_db::DbPool;

use crate::bounded::bounded;
use crate::error::WriteError;

/// A tracked mutation or milestone to be recorded.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub details: ActivityDetails,
    pub subjects: Vec<SubjectRef>,
    /// Overrides the description rendered from `details`.
    pub description: Option<String>,
    /// `None` for system events.
    pub actor_id: Option<DbId>,
}

impl NewActivity {
    pub fn new(details: ActivityDetails, subjects: Vec<SubjectRef>, actor_id: Option<DbId>) -> Self {
        Self {
            details,
            subjects,
            description: None,
            actor_id,
        }
    }
}

/// Writes activity log entries. Cheap to clone.
#[derive(Clone)]
pub struct ActivityRecorder {
    pool: DbPool,
    store_timeout: Duration,
}

impl ActivityRecorder {
    pub fn new(pool: DbPool, store_timeout: Duration) -> Self {
        Self {
            pool,
            store_timeout,
        }
    }

    /// Validate and append one entry.
    ///
    /// Validation runs before any store call. The append is a single INSERT;
    /// the store assigns `id` and `created_at`.
    pub async fn record(&self, activity: NewActivity) -> Result<ActivityLogEntry, WriteError> {
        validate_new_activity(&activity.details, &activity.subjects)?;

        let mut row =
            NewActivityLog::from_details(&activity.details, activity.actor_id, activity.subjects)?;
        if let Some(description) = activity.description {
            row.description = description;
        }

        let stored = bounded(
            self.store_timeout,
            ActivityLogRepo::insert(&self.pool, &row),
            WriteError::Timeout,
        )
        .await?;

        let entry = ActivityLogEntry::try_from(stored)?;
        tracing::debug!(
            activity_id = entry.id,
            activity_type = %entry.activity_type(),
            "Activity recorded"
        );
        Ok(entry)
    }

    /// Like [`record`](Self::record), but a failure is logged and swallowed.
    ///
    /// Mutation handlers call this after their own write has committed, so
    /// the user-facing operation succeeds regardless of the audit append.
    pub async fn record_best_effort(&self, activity: NewActivity) -> Option<ActivityLogEntry> {
        let activity_type = activity.details.activity_type();
        match self.record(activity).await {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    activity_type = %activity_type,
                    "Failed to record activity"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use sqlx::postgres::PgPoolOptions;
    use vendorhub_core::activity::EntityKind;

    /// A pool that never connects: any store call fails or times out.
    fn unreachable_recorder() -> ActivityRecorder {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(100))
            .connect_lazy("postgres://nobody@127.0.0.1:1/none")
            .unwrap();
        ActivityRecorder::new(pool, Duration::from_millis(200))
    }

    #[tokio::test]
    async fn missing_subject_fails_before_any_store_call() {
        let recorder = unreachable_recorder();
        let activity = NewActivity::new(
            ActivityDetails::EntityDeleted {
                entity: EntityKind::Vendor,
                name: "Acme".into(),
            },
            vec![],
            Some(1),
        );
        assert_matches!(recorder.record(activity).await, Err(WriteError::Validation(_)));
    }

    #[tokio::test]
    async fn invalid_rating_is_a_validation_error() {
        let recorder = unreachable_recorder();
        let activity = NewActivity::new(
            ActivityDetails::EntityRated {
                name: "Acme".into(),
                rating: -1.0,
                previous_rating: None,
            },
            vec![SubjectRef::vendor(1)],
            None,
        );
        assert_matches!(recorder.record(activity).await, Err(WriteError::Validation(_)));
    }

    #[tokio::test]
    async fn best_effort_swallows_store_failure() {
        let recorder = unreachable_recorder();
        let activity = NewActivity::new(ActivityDetails::UserSignedIn {}, vec![], Some(1));
        assert!(recorder.record_best_effort(activity).await.is_none());
    }
}
