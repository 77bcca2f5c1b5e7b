//! Aggregation queries backing the dashboard.
//!
//! Two flavours per report: a call into a server-side SQL function, and a
//! raw scan the caller groups in memory when that function is missing.

use chrono::NaiveDate;
use sqlx::PgPool;
use vendorhub_core::activity::EntityKind;
use vendorhub_core::aggregation::RankField;

use crate::models::dashboard::{CountRow, DashboardSummary, RankRow, SpendRow};

/// Tables that carry a `status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSource {
    Vendors,
    Contracts,
}

impl StatusSource {
    /// Documents have no status.
    pub fn for_entity(entity: EntityKind) -> Option<Self> {
        match entity {
            EntityKind::Vendor => Some(StatusSource::Vendors),
            EntityKind::Contract => Some(StatusSource::Contracts),
            EntityKind::Document => None,
        }
    }

    fn table(self) -> &'static str {
        match self {
            StatusSource::Vendors => "vendors",
            StatusSource::Contracts => "contracts",
        }
    }

    fn function(self) -> &'static str {
        match self {
            StatusSource::Vendors => "vendor_status_distribution",
            StatusSource::Contracts => "contract_status_distribution",
        }
    }
}

/// A rankable `(table, column)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankTarget {
    VendorRating,
    VendorPerformance,
    ContractValue,
}

impl RankTarget {
    /// Returns `None` for pairs that cannot be ranked.
    pub fn from_pair(entity: EntityKind, field: RankField) -> Option<Self> {
        match (entity, field) {
            (EntityKind::Vendor, RankField::Rating) => Some(RankTarget::VendorRating),
            (EntityKind::Vendor, RankField::PerformanceScore) => Some(RankTarget::VendorPerformance),
            (EntityKind::Contract, RankField::Value) => Some(RankTarget::ContractValue),
            _ => None,
        }
    }

    /// `(table, label column, value column)`.
    fn columns(self) -> (&'static str, &'static str, &'static str) {
        match self {
            RankTarget::VendorRating => ("vendors", "name", "rating"),
            RankTarget::VendorPerformance => ("vendors", "name", "performance_score"),
            RankTarget::ContractValue => ("contracts", "title", "value_minor"),
        }
    }
}

/// Provides read-only aggregation queries.
pub struct ReportRepo;

impl ReportRepo {
    // -- categories ---------------------------------------------------------

    /// Category counts from `vendor_category_distribution()`.
    pub async fn category_distribution(pool: &PgPool) -> Result<Vec<CountRow>, sqlx::Error> {
        sqlx::query_as::<_, CountRow>("SELECT label, count FROM vendor_category_distribution()")
            .fetch_all(pool)
            .await
    }

    /// Every vendor's raw category, one entry per row.
    pub async fn scan_vendor_categories(pool: &PgPool) -> Result<Vec<Option<String>>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<String>>("SELECT category FROM vendors")
            .fetch_all(pool)
            .await
    }

    // -- statuses -----------------------------------------------------------

    /// Raw status counts from the table's distribution function.
    pub async fn status_distribution(
        pool: &PgPool,
        source: StatusSource,
    ) -> Result<Vec<CountRow>, sqlx::Error> {
        let query = format!("SELECT label, count FROM {}()", source.function());
        sqlx::query_as::<_, CountRow>(&query).fetch_all(pool).await
    }

    /// Every row's raw status.
    pub async fn scan_statuses(
        pool: &PgPool,
        source: StatusSource,
    ) -> Result<Vec<Option<String>>, sqlx::Error> {
        let query = format!("SELECT status FROM {}", source.table());
        sqlx::query_scalar::<_, Option<String>>(&query)
            .fetch_all(pool)
            .await
    }

    // -- spend --------------------------------------------------------------

    /// Per-vendor contract value sums from `vendor_spend_totals()`.
    pub async fn spend_totals(pool: &PgPool) -> Result<Vec<SpendRow>, sqlx::Error> {
        sqlx::query_as::<_, SpendRow>("SELECT vendor_name, total_minor FROM vendor_spend_totals()")
            .fetch_all(pool)
            .await
    }

    /// One `(vendor_name, value)` row per valued contract.
    pub async fn scan_contract_values(pool: &PgPool) -> Result<Vec<SpendRow>, sqlx::Error> {
        sqlx::query_as::<_, SpendRow>(
            "SELECT v.name AS vendor_name, c.value_minor AS total_minor
             FROM contracts c
             LEFT JOIN vendors v ON v.id = c.vendor_id
             WHERE c.value_minor IS NOT NULL",
        )
        .fetch_all(pool)
        .await
    }

    // -- ranking ------------------------------------------------------------

    /// Top `n` rows by the target column, highest first, NULLs excluded.
    pub async fn top_n(pool: &PgPool, target: RankTarget, n: i64) -> Result<Vec<RankRow>, sqlx::Error> {
        let (table, label, value) = target.columns();
        let query = format!(
            "SELECT id, {label} AS label, {value}::DOUBLE PRECISION AS value
             FROM {table}
             WHERE {value} IS NOT NULL
             ORDER BY {value} DESC, id ASC
             LIMIT $1"
        );
        sqlx::query_as::<_, RankRow>(&query)
            .bind(n)
            .fetch_all(pool)
            .await
    }

    // -- summary ------------------------------------------------------------

    /// Headline counts. Contracts ending in `(today, expiry_until]` count as expiring.
    pub async fn summary(
        pool: &PgPool,
        today: NaiveDate,
        expiry_until: NaiveDate,
    ) -> Result<DashboardSummary, sqlx::Error> {
        sqlx::query_as::<_, DashboardSummary>(
            "SELECT
                (SELECT COUNT(*) FROM vendors)::BIGINT AS vendor_count,
                (SELECT COUNT(*) FROM vendors
                    WHERE LOWER(TRIM(status)) = 'active')::BIGINT AS active_vendor_count,
                (SELECT COUNT(*) FROM contracts
                    WHERE LOWER(TRIM(status)) = 'active')::BIGINT AS active_contract_count,
                (SELECT COUNT(*) FROM contracts
                    WHERE end_date > $1 AND end_date <= $2)::BIGINT AS expiring_contract_count,
                (SELECT COUNT(*) FROM documents)::BIGINT AS document_count,
                (SELECT COALESCE(SUM(value_minor), 0) FROM contracts)::BIGINT
                    AS total_contract_value_minor",
        )
        .bind(today)
        .bind(expiry_until)
        .fetch_one(pool)
        .await
    }
}
