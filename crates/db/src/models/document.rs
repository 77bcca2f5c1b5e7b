//! Document metadata model and DTOs.
//!
//! Documents are registered after the binary has been stored in the blob
//! store; only metadata is kept here.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use vendorhub_core::types::{DbId, Timestamp};

/// A row from the `documents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    pub vendor_id: Option<DbId>,
    pub contract_id: Option<DbId>,
    pub file_name: String,
    pub storage_path: String,
    pub content_type: String,
    pub file_size: i64,
    pub uploaded_by: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for registering an uploaded document.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDocument {
    pub vendor_id: Option<DbId>,
    pub contract_id: Option<DbId>,
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    #[validate(length(min = 1, max = 1024))]
    pub storage_path: String,
    #[validate(length(min = 1, max = 100))]
    pub content_type: String,
    #[validate(range(min = 0))]
    pub file_size: i64,
}
