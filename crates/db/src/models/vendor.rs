//! Vendor entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use vendorhub_core::types::{DbId, Timestamp};

/// A row from the `vendors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Vendor {
    pub id: DbId,
    pub name: String,
    pub category: Option<String>,
    pub status: Option<String>,
    pub rating: Option<f64>,
    pub performance_score: Option<i32>,
    pub contact_email: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a vendor.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVendor {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[validate(length(max = 50))]
    pub status: Option<String>,
    #[validate(range(min = 0, max = 100))]
    pub performance_score: Option<i32>,
    #[validate(email)]
    pub contact_email: Option<String>,
}

/// DTO for updating a vendor. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateVendor {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[validate(length(max = 50))]
    pub status: Option<String>,
    #[validate(range(min = 0, max = 100))]
    pub performance_score: Option<i32>,
    #[validate(email)]
    pub contact_email: Option<String>,
}

/// DTO for rating a vendor on a 0-5 scale.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RateVendor {
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: f64,
}
