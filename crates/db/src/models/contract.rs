//! Contract entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};
use vendorhub_core::types::{DbId, MinorUnits, Timestamp};

/// A row from the `contracts` table.
///
/// `value_minor` is the contract value in minor currency units.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contract {
    pub id: DbId,
    pub vendor_id: Option<DbId>,
    pub title: String,
    pub status: Option<String>,
    pub value_minor: Option<MinorUnits>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a contract.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_create_dates"))]
pub struct CreateContract {
    pub vendor_id: Option<DbId>,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 50))]
    pub status: Option<String>,
    #[validate(range(min = 0))]
    pub value_minor: Option<MinorUnits>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// DTO for updating a contract. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_update_dates"))]
pub struct UpdateContract {
    pub vendor_id: Option<DbId>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 50))]
    pub status: Option<String>,
    #[validate(range(min = 0))]
    pub value_minor: Option<MinorUnits>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

fn check_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(s), Some(e)) if e < s => Err(ValidationError::new("end_date_before_start_date")),
        _ => Ok(()),
    }
}

fn validate_create_dates(input: &CreateContract) -> Result<(), ValidationError> {
    check_dates(input.start_date, input.end_date)
}

fn validate_update_dates(input: &UpdateContract) -> Result<(), ValidationError> {
    check_dates(input.start_date, input.end_date)
}
