//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches, where the
//!   entity supports updates

pub mod activity;
pub mod contract;
pub mod dashboard;
pub mod document;
pub mod vendor;

use sqlx::FromRow;
use vendorhub_core::types::DbId;

/// `(id, display name)` projection used for batched name lookups.
#[derive(Debug, Clone, FromRow)]
pub struct EntityName {
    pub id: DbId,
    pub name: String,
}
