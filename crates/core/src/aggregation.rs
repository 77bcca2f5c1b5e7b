//! Dashboard bucketing: label normalization, grouping, and spend rollups.
//!
//! Every grouping keeps all scanned rows. A row with a blank grouping key
//! lands in an explicit fallback bucket instead of being dropped, so the
//! bucket counts always add up to the number of rows scanned.

use std::collections::HashMap;

use serde::Serialize;

use crate::activity::EntityKind;
use crate::error::CoreError;
use crate::types::{DbId, MinorUnits};

/// Fallback label for vendors without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Fallback label for rows without a status.
pub const UNKNOWN_STATUS: &str = "Unknown";

/// Spend totals are reported in thousands of the source unit.
pub const DISPLAY_SCALE: MinorUnits = 1000;

/// Default number of rows for ranked reports.
pub const DEFAULT_TOP_N: i64 = 5;

/// Maximum number of rows for ranked reports.
pub const MAX_TOP_N: i64 = 50;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// A `(label, count)` bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub count: i64,
}

/// A `(label, sum)` bucket for monetary rollups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendBucket {
    pub label: String,
    pub total_minor: MinorUnits,
    pub total_display: f64,
}

/// One row of a top-N ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedItem {
    pub id: DbId,
    pub label: String,
    pub value: f64,
}

/// Fields a top-N ranking can be computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankField {
    Rating,
    PerformanceScore,
    Value,
}

impl RankField {
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.trim() {
            "rating" => Ok(RankField::Rating),
            "performance_score" => Ok(RankField::PerformanceScore),
            "value" => Ok(RankField::Value),
            other => Err(CoreError::validation(format!("Unknown rank field '{other}'"))),
        }
    }

    /// Check that `self` is a rankable field of `entity`.
    pub fn ensure_applies_to(self, entity: EntityKind) -> Result<(), CoreError> {
        let ok = matches!(
            (entity, self),
            (EntityKind::Vendor, RankField::Rating)
                | (EntityKind::Vendor, RankField::PerformanceScore)
                | (EntityKind::Contract, RankField::Value)
        );
        if ok {
            Ok(())
        } else {
            Err(CoreError::validation(format!(
                "Cannot rank {} rows by {self:?}",
                entity.as_str()
            )))
        }
    }
}

// ---------------------------------------------------------------------------
// Label normalization
// ---------------------------------------------------------------------------

/// Trim a category; blank or absent becomes [`UNCATEGORIZED`].
pub fn normalize_category(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => UNCATEGORIZED.to_string(),
    }
}

/// Capitalize a status (`"on_hold"` → `"On hold"`); blank becomes [`UNKNOWN_STATUS`].
pub fn normalize_status(raw: Option<&str>) -> String {
    let Some(status) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return UNKNOWN_STATUS.to_string();
    };
    let lowered = status.replace('_', " ").to_lowercase();
    let mut chars = lowered.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => UNKNOWN_STATUS.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Group pre-counted `(raw_key, count)` pairs under normalized labels.
///
/// Distinct raw keys that normalize to the same label (`"active"`,
/// `" Active "`) merge into one bucket. Output is ordered by count
/// descending, then label ascending.
pub fn merge_counts<I, S>(rows: I, normalize: fn(Option<&str>) -> String) -> Vec<Bucket>
where
    I: IntoIterator<Item = (Option<S>, i64)>,
    S: AsRef<str>,
{
    let mut totals: HashMap<String, i64> = HashMap::new();
    for (raw, count) in rows {
        *totals.entry(normalize(raw.as_ref().map(|s| s.as_ref()))).or_default() += count;
    }
    let mut buckets: Vec<Bucket> = totals
        .into_iter()
        .map(|(label, count)| Bucket { label, count })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    buckets
}

/// Count scanned category values per normalized category.
pub fn count_by_category<I, S>(categories: I) -> Vec<Bucket>
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    merge_counts(categories.into_iter().map(|c| (c, 1)), normalize_category)
}

/// Count scanned status values per capitalized status.
pub fn count_by_status<I, S>(statuses: I) -> Vec<Bucket>
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    merge_counts(statuses.into_iter().map(|s| (s, 1)), normalize_status)
}

// ---------------------------------------------------------------------------
// Spend
// ---------------------------------------------------------------------------

/// Convert a minor-unit total to the display scale. Called once per bucket.
pub fn to_display(total_minor: MinorUnits) -> f64 {
    total_minor as f64 / DISPLAY_SCALE as f64
}

/// Sum `(vendor_name, amount)` rows per vendor and keep the top `n`.
///
/// Rows without a vendor name land in the vendor placeholder bucket. Sums are
/// integer; the display value is derived last. Ties on total are broken by
/// label so repeated runs agree.
pub fn spend_by_vendor<I, S>(rows: I, n: usize) -> Vec<SpendBucket>
where
    I: IntoIterator<Item = (Option<S>, MinorUnits)>,
    S: AsRef<str>,
{
    let mut totals: HashMap<String, MinorUnits> = HashMap::new();
    for (vendor, amount) in rows {
        let label = match vendor.as_ref().map(|v| v.as_ref().trim()) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => EntityKind::Vendor.placeholder_name().to_string(),
        };
        let total = totals.entry(label).or_default();
        *total = total.saturating_add(amount);
    }
    let mut ranked: Vec<(String, MinorUnits)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
        .into_iter()
        .take(n)
        .map(|(label, total_minor)| SpendBucket {
            label,
            total_minor,
            total_display: to_display(total_minor),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Keep the first `n` rows that have a rank value, in the order given.
///
/// The store already ordered the rows; ties stay in store order.
pub fn take_ranked<I>(rows: I, n: usize) -> Vec<RankedItem>
where
    I: IntoIterator<Item = (DbId, String, Option<f64>)>,
{
    rows.into_iter()
        .filter_map(|(id, label, value)| value.map(|value| RankedItem { id, label, value }))
        .take(n)
        .collect()
}
