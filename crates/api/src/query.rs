//! Shared query parameter types for API handlers.

use serde::Deserialize;
use vendorhub_core::types::DbId;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped in the repository layer via `clamp_limit` /
/// `clamp_offset`.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Pagination plus an optional owning-vendor filter.
#[derive(Debug, Default, Deserialize)]
pub struct VendorScopedParams {
    pub vendor_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
