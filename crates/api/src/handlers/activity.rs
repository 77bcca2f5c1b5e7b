//! Handlers for the audit log query and the composed activity feed.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use vendorhub_core::activity::{ActivityType, EntityKind, SubjectRef};
use vendorhub_core::feed::FeedItem;
use vendorhub_core::types::{DbId, Timestamp};
use vendorhub_db::models::activity::{ActivityLogEntry, ActivityLogPage, ActivityLogQuery};
use vendorhub_db::repositories::ActivityLogRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameter types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /activity`.
#[derive(Debug, Default, Deserialize)]
pub struct ActivityLogQueryParams {
    pub activity_type: Option<String>,
    pub actor_id: Option<DbId>,
    pub subject_kind: Option<String>,
    pub subject_id: Option<DbId>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for `GET /activity/feed`.
#[derive(Debug, Default, Deserialize)]
pub struct FeedParams {
    pub limit: Option<i64>,
    pub since: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse an optional RFC 3339 timestamp.
fn parse_timestamp(name: &str, value: Option<&str>) -> AppResult<Option<Timestamp>> {
    value
        .map(|v| {
            chrono::DateTime::parse_from_rfc3339(v)
                .map(|t| t.with_timezone(&chrono::Utc))
                .map_err(|_| {
                    AppError::BadRequest(format!("Invalid '{name}' timestamp, expected RFC 3339"))
                })
        })
        .transpose()
}

impl ActivityLogQueryParams {
    fn into_query(self) -> AppResult<ActivityLogQuery> {
        let activity_type = self
            .activity_type
            .as_deref()
            .map(ActivityType::parse)
            .transpose()?;

        let subject = match (self.subject_kind.as_deref(), self.subject_id) {
            (Some(kind), Some(id)) => Some(SubjectRef {
                kind: EntityKind::parse(kind)?,
                id,
            }),
            (None, None) => None,
            _ => {
                return Err(AppError::BadRequest(
                    "subject_kind and subject_id must be given together".into(),
                ))
            }
        };

        Ok(ActivityLogQuery {
            activity_type,
            actor_id: self.actor_id,
            subject,
            from: parse_timestamp("from", self.from.as_deref())?,
            to: parse_timestamp("to", self.to.as_deref())?,
            limit: self.limit,
            offset: self.offset,
        })
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/activity
///
/// Filtered, paginated audit log, newest first. Rows whose stored metadata no
/// longer decodes are logged and left out of `items`.
pub async fn query_activity_logs(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ActivityLogQueryParams>,
) -> AppResult<Json<DataResponse<ActivityLogPage>>> {
    let query = params.into_query()?;

    let rows = ActivityLogRepo::query(&state.pool, &query).await?;
    let total = ActivityLogRepo::count(&state.pool, &query).await?;

    let items = rows
        .into_iter()
        .filter_map(|row| {
            let id = row.id;
            match ActivityLogEntry::try_from(row) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(log_id = id, error = %e, "Skipping undecodable activity log row");
                    None
                }
            }
        })
        .collect();

    Ok(Json(DataResponse {
        data: ActivityLogPage { items, total },
    }))
}

/// GET /api/v1/activity/feed?limit=&since=
pub async fn feed(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<FeedParams>,
) -> AppResult<Json<DataResponse<Vec<FeedItem>>>> {
    let since = parse_timestamp("since", params.since.as_deref())?;
    let items = state.feed.compose(params.limit, since).await?;
    tracing::debug!(count = items.len(), "Composed activity feed");
    Ok(Json(DataResponse { data: items }))
}
