//! Repository for the `vendors` table.

use sqlx::PgPool;
use vendorhub_core::types::{DbId, Timestamp};

use crate::models::vendor::{CreateVendor, UpdateVendor, Vendor};
use crate::models::EntityName;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, category, status, rating, performance_score, \
    contact_email, created_at, updated_at";

/// Provides CRUD and feed lookups for vendors.
pub struct VendorRepo;

impl VendorRepo {
    /// Insert a new vendor, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateVendor) -> Result<Vendor, sqlx::Error> {
        let query = format!(
            "INSERT INTO vendors (name, category, status, performance_score, contact_email)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vendor>(&query)
            .bind(&input.name)
            .bind(&input.category)
            .bind(&input.status)
            .bind(input.performance_score)
            .bind(&input.contact_email)
            .fetch_one(pool)
            .await
    }

    /// Find a vendor by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Vendor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vendors WHERE id = $1");
        sqlx::query_as::<_, Vendor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List vendors alphabetically.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Vendor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vendors ORDER BY name, id LIMIT $1 OFFSET $2");
        sqlx::query_as::<_, Vendor>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a vendor. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVendor,
    ) -> Result<Option<Vendor>, sqlx::Error> {
        let query = format!(
            "UPDATE vendors SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                status = COALESCE($4, status),
                performance_score = COALESCE($5, performance_score),
                contact_email = COALESCE($6, contact_email)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vendor>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.category)
            .bind(&input.status)
            .bind(input.performance_score)
            .bind(&input.contact_email)
            .fetch_optional(pool)
            .await
    }

    /// Set a vendor's rating. Returns `None` if the vendor does not exist.
    pub async fn set_rating(
        pool: &PgPool,
        id: DbId,
        rating: f64,
    ) -> Result<Option<Vendor>, sqlx::Error> {
        let query = format!("UPDATE vendors SET rating = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Vendor>(&query)
            .bind(id)
            .bind(rating)
            .fetch_optional(pool)
            .await
    }

    /// Delete a vendor, returning the removed row so callers can describe it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Vendor>, sqlx::Error> {
        let query = format!("DELETE FROM vendors WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Vendor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Most recently created vendors, newest first, optionally since a cutoff.
    pub async fn list_recent(
        pool: &PgPool,
        limit: i64,
        since: Option<Timestamp>,
    ) -> Result<Vec<Vendor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vendors
             WHERE ($2::timestamptz IS NULL OR created_at >= $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, Vendor>(&query)
            .bind(limit)
            .bind(since)
            .fetch_all(pool)
            .await
    }

    /// Batched name lookup. Ids with no row are simply absent from the result.
    pub async fn find_names(pool: &PgPool, ids: &[DbId]) -> Result<Vec<EntityName>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, EntityName>("SELECT id, name FROM vendors WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}
