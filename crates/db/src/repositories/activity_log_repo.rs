//! Repository for the append-only `activity_logs` table.
//!
//! No update or delete methods exist; the table also carries a trigger
//! rejecting both.

use sqlx::types::Json;
use sqlx::PgPool;
use vendorhub_core::activity::SubjectRef;
use vendorhub_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use vendorhub_core::types::{DbId, Timestamp};

use crate::models::activity::{ActivityLogQuery, ActivityLogRow, NewActivityLog};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

/// Column list for `activity_logs` SELECT queries.
const COLUMNS: &str = "id, created_at, activity_type, description, actor_id, subjects, metadata";

// ---------------------------------------------------------------------------
// ActivityLogRepo
// ---------------------------------------------------------------------------

/// Provides insert and query operations for activity logs.
pub struct ActivityLogRepo;

impl ActivityLogRepo {
    /// Append one entry. `id` and `created_at` are assigned by the store.
    pub async fn insert(pool: &PgPool, entry: &NewActivityLog) -> Result<ActivityLogRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO activity_logs (activity_type, description, actor_id, subjects, metadata)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityLogRow>(&query)
            .bind(entry.activity_type.as_str())
            .bind(&entry.description)
            .bind(entry.actor_id)
            .bind(Json(&entry.subjects))
            .bind(&entry.metadata)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ActivityLogRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM activity_logs WHERE id = $1");
        sqlx::query_as::<_, ActivityLogRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Query activity logs with filtering and pagination, newest first.
    pub async fn query(
        pool: &PgPool,
        params: &ActivityLogQuery,
    ) -> Result<Vec<ActivityLogRow>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let offset = clamp_offset(params.offset);

        let (where_clause, bind_values, bind_idx) = build_activity_filter(params);

        let query = format!(
            "SELECT {COLUMNS} FROM activity_logs {where_clause} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = bind_activity_values(sqlx::query_as::<_, ActivityLogRow>(&query), &bind_values);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count activity logs matching the given filter (for pagination metadata).
    pub async fn count(pool: &PgPool, params: &ActivityLogQuery) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_activity_filter(params);

        let query = format!("SELECT COUNT(*)::BIGINT AS count FROM activity_logs {where_clause}");

        let q = bind_activity_values_scalar(sqlx::query_scalar::<_, i64>(&query), &bind_values);
        q.fetch_one(pool).await
    }

    /// Most recent entries, newest first, optionally since a cutoff.
    pub async fn list_recent(
        pool: &PgPool,
        limit: i64,
        since: Option<Timestamp>,
    ) -> Result<Vec<ActivityLogRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activity_logs
             WHERE ($2::timestamptz IS NULL OR created_at >= $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, ActivityLogRow>(&query)
            .bind(limit)
            .bind(since)
            .fetch_all(pool)
            .await
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built activity log queries.
enum BindValue {
    BigInt(i64),
    Text(&'static str),
    Timestamp(Timestamp),
    Subjects(Json<Vec<SubjectRef>>),
}

/// Build a WHERE clause and bind values from `ActivityLogQuery` filters.
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
/// The `where_clause` is empty if no filters are active, or starts with `WHERE `.
fn build_activity_filter(params: &ActivityLogQuery) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(activity_type) = params.activity_type {
        conditions.push(format!("activity_type = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(activity_type.as_str()));
    }

    if let Some(actor_id) = params.actor_id {
        conditions.push(format!("actor_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(actor_id));
    }

    if let Some(subject) = params.subject {
        // Containment hits the GIN index on `subjects`.
        conditions.push(format!("subjects @> ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Subjects(Json(vec![subject])));
    }

    if let Some(from) = params.from {
        conditions.push(format!("created_at >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(from));
    }

    if let Some(to) = params.to {
        conditions.push(format!("created_at <= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(to));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_activity_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(*v),
            BindValue::Timestamp(v) => q = q.bind(*v),
            BindValue::Subjects(v) => q = q.bind(v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_activity_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(*v),
            BindValue::Timestamp(v) => q = q.bind(*v),
            BindValue::Subjects(v) => q = q.bind(v),
        }
    }
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use vendorhub_core::activity::ActivityType;

    #[test]
    fn empty_filter_has_no_where_clause() {
        let (clause, values, next) = build_activity_filter(&ActivityLogQuery::default());
        assert!(clause.is_empty());
        assert!(values.is_empty());
        assert_eq!(next, 1);
    }

    #[test]
    fn filters_are_numbered_in_order() {
        let params = ActivityLogQuery {
            activity_type: Some(ActivityType::EntityRated),
            subject: Some(SubjectRef::vendor(4)),
            ..Default::default()
        };
        let (clause, values, next) = build_activity_filter(&params);
        assert_eq!(clause, "WHERE activity_type = $1 AND subjects @> $2");
        assert_eq!(values.len(), 2);
        assert_eq!(next, 3);
    }
}
