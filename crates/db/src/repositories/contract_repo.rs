//! Repository for the `contracts` table.

use chrono::NaiveDate;
use sqlx::PgPool;
use vendorhub_core::types::{DbId, Timestamp};

use crate::models::contract::{Contract, CreateContract, UpdateContract};
use crate::models::EntityName;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, vendor_id, title, status, value_minor, start_date, end_date, \
    created_at, updated_at";

/// Provides CRUD and feed lookups for contracts.
pub struct ContractRepo;

impl ContractRepo {
    /// Insert a new contract, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateContract) -> Result<Contract, sqlx::Error> {
        let query = format!(
            "INSERT INTO contracts (vendor_id, title, status, value_minor, start_date, end_date)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(input.vendor_id)
            .bind(&input.title)
            .bind(&input.status)
            .bind(input.value_minor)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(pool)
            .await
    }

    /// Find a contract by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contracts WHERE id = $1");
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List contracts, optionally for one vendor, newest first.
    pub async fn list(
        pool: &PgPool,
        vendor_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Contract>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contracts
             WHERE ($1::bigint IS NULL OR vendor_id = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(vendor_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a contract. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateContract,
    ) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!(
            "UPDATE contracts SET
                vendor_id = COALESCE($2, vendor_id),
                title = COALESCE($3, title),
                status = COALESCE($4, status),
                value_minor = COALESCE($5, value_minor),
                start_date = COALESCE($6, start_date),
                end_date = COALESCE($7, end_date)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .bind(input.vendor_id)
            .bind(&input.title)
            .bind(&input.status)
            .bind(input.value_minor)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_optional(pool)
            .await
    }

    /// Delete a contract, returning the removed row.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!("DELETE FROM contracts WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Most recently created contracts, newest first, optionally since a cutoff.
    pub async fn list_recent(
        pool: &PgPool,
        limit: i64,
        since: Option<Timestamp>,
    ) -> Result<Vec<Contract>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contracts
             WHERE ($2::timestamptz IS NULL OR created_at >= $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(limit)
            .bind(since)
            .fetch_all(pool)
            .await
    }

    /// Contracts whose end date falls in `(after, until]`, soonest end first.
    pub async fn list_ending_between(
        pool: &PgPool,
        after: NaiveDate,
        until: NaiveDate,
        limit: i64,
    ) -> Result<Vec<Contract>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contracts
             WHERE end_date > $1 AND end_date <= $2
             ORDER BY end_date ASC, id ASC
             LIMIT $3"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(after)
            .bind(until)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Batched title lookup. Ids with no row are simply absent from the result.
    pub async fn find_names(pool: &PgPool, ids: &[DbId]) -> Result<Vec<EntityName>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, EntityName>(
            "SELECT id, title AS name FROM contracts WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }
}
