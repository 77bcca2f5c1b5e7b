//! Dashboard aggregation.
//!
//! Each report first asks the store's aggregation function. If the function
//! is not installed (`undefined_function`), the reporter scans the raw
//! column and groups in memory with the same label rules. Every other
//! failure propagates; nothing is ever substituted for real data.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use vendorhub_core::activity::EntityKind;
use vendorhub_core::aggregation::{
    count_by_category, count_by_status, merge_counts, normalize_category, normalize_status,
    spend_by_vendor, take_ranked, Bucket, RankField, RankedItem, SpendBucket, DEFAULT_TOP_N,
    MAX_TOP_N,
};
use vendorhub_core::expiry::EXPIRY_LOOKAHEAD_DAYS;
use vendorhub_core::pagination::validate_limit;
use vendorhub_db::models::dashboard::DashboardSummary;
use vendorhub_db::repositories::{RankTarget, ReportRepo, StatusSource};
use vendorhub_db::DbPool;

use crate::bounded::bounded;
use crate::error::ReportError;

/// PostgreSQL `undefined_function`.
const UNDEFINED_FUNCTION: &str = "42883";

/// Computes dashboard rollups. Cheap to clone.
#[derive(Clone)]
pub struct Reporter {
    pool: DbPool,
    store_timeout: Duration,
}

impl Reporter {
    pub fn new(pool: DbPool, store_timeout: Duration) -> Self {
        Self {
            pool,
            store_timeout,
        }
    }

    /// Vendor counts per category. Blank categories count as "Uncategorized".
    pub async fn count_by_category(&self) -> Result<Vec<Bucket>, ReportError> {
        match self.run(ReportRepo::category_distribution(&self.pool)).await {
            Ok(rows) => Ok(merge_counts(
                rows.into_iter().map(|r| (r.label, r.count)),
                normalize_category,
            )),
            Err(e) if is_undefined_function(&e) => {
                tracing::warn!("vendor_category_distribution() missing, scanning vendors");
                let categories = self.run(ReportRepo::scan_vendor_categories(&self.pool)).await?;
                Ok(count_by_category(categories))
            }
            Err(e) => Err(e),
        }
    }

    /// Row counts per capitalized status for vendors or contracts.
    pub async fn count_by_status(&self, entity: EntityKind) -> Result<Vec<Bucket>, ReportError> {
        let source = StatusSource::for_entity(entity).ok_or_else(|| {
            ReportError::Validation(format!("{} rows have no status", entity.as_str()))
        })?;

        match self.run(ReportRepo::status_distribution(&self.pool, source)).await {
            Ok(rows) => Ok(merge_counts(
                rows.into_iter().map(|r| (r.label, r.count)),
                normalize_status,
            )),
            Err(e) if is_undefined_function(&e) => {
                tracing::warn!(entity = entity.as_str(), "Status function missing, scanning rows");
                let statuses = self.run(ReportRepo::scan_statuses(&self.pool, source)).await?;
                Ok(count_by_status(statuses))
            }
            Err(e) => Err(e),
        }
    }

    /// Highest `n` rows by `field`, in store order. Rows without a value are excluded.
    pub async fn top_n(
        &self,
        entity: EntityKind,
        field: RankField,
        n: Option<i64>,
    ) -> Result<Vec<RankedItem>, ReportError> {
        field.ensure_applies_to(entity)?;
        let n = validate_limit(n, DEFAULT_TOP_N, MAX_TOP_N)?;
        let target = RankTarget::from_pair(entity, field).ok_or_else(|| {
            ReportError::Validation(format!("Cannot rank {} rows by {field:?}", entity.as_str()))
        })?;

        let rows = self.run(ReportRepo::top_n(&self.pool, target, n as i64)).await?;
        Ok(take_ranked(rows.into_iter().map(|r| (r.id, r.label, r.value)), n))
    }

    /// Top `n` vendors by summed contract value.
    pub async fn spend_by_vendor(&self, n: Option<i64>) -> Result<Vec<SpendBucket>, ReportError> {
        let n = validate_limit(n, DEFAULT_TOP_N, MAX_TOP_N)?;

        let rows = match self.run(ReportRepo::spend_totals(&self.pool)).await {
            Ok(rows) => rows,
            Err(e) if is_undefined_function(&e) => {
                tracing::warn!("vendor_spend_totals() missing, scanning contracts");
                self.run(ReportRepo::scan_contract_values(&self.pool)).await?
            }
            Err(e) => return Err(e),
        };
        Ok(spend_by_vendor(
            rows.into_iter().map(|r| (r.vendor_name, r.total_minor)),
            n,
        ))
    }

    /// Headline counts for the dashboard.
    pub async fn summary(&self) -> Result<DashboardSummary, ReportError> {
        let now = Utc::now();
        let today = now.date_naive();
        let until = (now + chrono::Duration::days(EXPIRY_LOOKAHEAD_DAYS)).date_naive();
        self.run(ReportRepo::summary(&self.pool, today, until)).await
    }

    async fn run<F, T>(&self, fut: F) -> Result<T, ReportError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        bounded(self.store_timeout, fut, ReportError::Timeout).await
    }
}

fn is_undefined_function(err: &ReportError) -> bool {
    match err {
        ReportError::Store(sqlx::Error::Database(db)) => db.code().as_deref() == Some(UNDEFINED_FUNCTION),
        _ => false,
    }
}
