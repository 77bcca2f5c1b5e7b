//! Row projections for dashboard aggregation queries.

use serde::Serialize;
use sqlx::FromRow;
use vendorhub_core::types::{DbId, MinorUnits};

/// `(label, count)` row from a server-side distribution function.
#[derive(Debug, Clone, FromRow)]
pub struct CountRow {
    pub label: Option<String>,
    pub count: i64,
}

/// `(vendor_name, amount)` row. Used for both pre-summed and raw rows.
#[derive(Debug, Clone, FromRow)]
pub struct SpendRow {
    pub vendor_name: Option<String>,
    pub total_minor: MinorUnits,
}

/// One candidate row for a top-N ranking, in store order.
#[derive(Debug, Clone, FromRow)]
pub struct RankRow {
    pub id: DbId,
    pub label: String,
    pub value: Option<f64>,
}

/// Headline counts for the dashboard.
///
/// "Active" means a status of `active` after trimming and lowercasing.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize)]
pub struct DashboardSummary {
    pub vendor_count: i64,
    pub active_vendor_count: i64,
    pub active_contract_count: i64,
    pub expiring_contract_count: i64,
    pub document_count: i64,
    pub total_contract_value_minor: MinorUnits,
}
