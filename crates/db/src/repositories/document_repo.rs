//! Repository for the `documents` table.

use sqlx::PgPool;
use vendorhub_core::types::{DbId, Timestamp};

use crate::models::document::{CreateDocument, Document};
use crate::models::EntityName;

const COLUMNS: &str = "id, vendor_id, contract_id, file_name, storage_path, content_type, \
    file_size, uploaded_by, created_at";

/// Provides create/read/delete for document metadata.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Register an uploaded document.
    ///
    /// A duplicate `storage_path` violates `uq_documents_storage_path`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateDocument,
        uploaded_by: Option<DbId>,
    ) -> Result<Document, sqlx::Error> {
        let query = format!(
            "INSERT INTO documents
                (vendor_id, contract_id, file_name, storage_path, content_type, file_size, uploaded_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(input.vendor_id)
            .bind(input.contract_id)
            .bind(&input.file_name)
            .bind(&input.storage_path)
            .bind(&input.content_type)
            .bind(input.file_size)
            .bind(uploaded_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE id = $1");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List documents, optionally for one vendor, newest first.
    pub async fn list(
        pool: &PgPool,
        vendor_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Document>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents
             WHERE ($1::bigint IS NULL OR vendor_id = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(vendor_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Delete a document's metadata, returning the removed row.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("DELETE FROM documents WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Most recent uploads, newest first, optionally since a cutoff.
    pub async fn list_recent(
        pool: &PgPool,
        limit: i64,
        since: Option<Timestamp>,
    ) -> Result<Vec<Document>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents
             WHERE ($2::timestamptz IS NULL OR created_at >= $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(limit)
            .bind(since)
            .fetch_all(pool)
            .await
    }

    /// Batched file-name lookup.
    pub async fn find_names(pool: &PgPool, ids: &[DbId]) -> Result<Vec<EntityName>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, EntityName>(
            "SELECT id, file_name AS name FROM documents WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }
}
