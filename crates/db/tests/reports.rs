//! Integration tests for dashboard aggregation queries.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use vendorhub_core::aggregation::{count_by_category, merge_counts, normalize_category};
use vendorhub_db::models::contract::CreateContract;
use vendorhub_db::models::vendor::CreateVendor;
use vendorhub_db::repositories::{ContractRepo, RankTarget, ReportRepo, StatusSource, VendorRepo};

async fn vendor(pool: &PgPool, name: &str, category: Option<&str>, status: Option<&str>) -> i64 {
    let input = CreateVendor {
        name: name.to_string(),
        category: category.map(str::to_string),
        status: status.map(str::to_string),
        performance_score: None,
        contact_email: None,
    };
    VendorRepo::create(pool, &input).await.unwrap().id
}

async fn contract(pool: &PgPool, vendor_id: Option<i64>, value: Option<i64>) -> i64 {
    let input = CreateContract {
        vendor_id,
        title: "Service".into(),
        status: Some("active".into()),
        value_minor: value,
        start_date: None,
        end_date: None,
    };
    ContractRepo::create(pool, &input).await.unwrap().id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_function_matches_scan(pool: PgPool) {
    vendor(&pool, "A", Some("IT"), None).await;
    vendor(&pool, "B", Some(" IT "), None).await;
    vendor(&pool, "C", Some("  "), None).await;
    vendor(&pool, "D", None, None).await;

    let server = merge_counts(
        ReportRepo::category_distribution(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|r| (r.label, r.count)),
        normalize_category,
    );
    let scanned = count_by_category(ReportRepo::scan_vendor_categories(&pool).await.unwrap());

    assert_eq!(server, scanned);
    assert_eq!(server.iter().map(|b| b.count).sum::<i64>(), 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_function_reports_undefined_function(pool: PgPool) {
    sqlx::query("DROP FUNCTION vendor_category_distribution()")
        .execute(&pool)
        .await
        .unwrap();

    let err = ReportRepo::category_distribution(&pool).await.unwrap_err();
    match err {
        sqlx::Error::Database(db) => assert_eq!(db.code().as_deref(), Some("42883")),
        other => panic!("expected database error, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_status_distribution_returns_raw_labels(pool: PgPool) {
    vendor(&pool, "A", None, Some("active")).await;
    vendor(&pool, "B", None, Some("active")).await;
    vendor(&pool, "C", None, None).await;

    let mut rows = ReportRepo::status_distribution(&pool, StatusSource::Vendors)
        .await
        .unwrap();
    rows.sort_by_key(|r| r.count);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].label, None);
    assert_eq!(rows[1].label.as_deref(), Some("active"));
    assert_eq!(rows[1].count, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_spend_totals_sum_per_vendor(pool: PgPool) {
    let a = vendor(&pool, "Vendor A", None, None).await;
    let b = vendor(&pool, "Vendor B", None, None).await;
    contract(&pool, Some(a), Some(100_000)).await;
    contract(&pool, Some(a), Some(250_000)).await;
    contract(&pool, Some(b), Some(50_000)).await;
    contract(&pool, Some(b), None).await;

    let mut rows = ReportRepo::spend_totals(&pool).await.unwrap();
    rows.sort_by(|x, y| y.total_minor.cmp(&x.total_minor));
    assert_eq!(rows[0].vendor_name.as_deref(), Some("Vendor A"));
    assert_eq!(rows[0].total_minor, 350_000);
    assert_eq!(rows[1].total_minor, 50_000);

    assert_eq!(ReportRepo::scan_contract_values(&pool).await.unwrap().len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_top_n_excludes_nulls(pool: PgPool) {
    let a = vendor(&pool, "A", None, None).await;
    let b = vendor(&pool, "B", None, None).await;
    vendor(&pool, "C", None, None).await;
    VendorRepo::set_rating(&pool, a, 3.0).await.unwrap();
    VendorRepo::set_rating(&pool, b, 4.5).await.unwrap();

    let rows = ReportRepo::top_n(&pool, RankTarget::VendorRating, 5).await.unwrap();
    let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["B", "A"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_summary_counts(pool: PgPool) {
    let a = vendor(&pool, "A", None, Some("Active ")).await;
    vendor(&pool, "B", None, Some("inactive")).await;
    contract(&pool, Some(a), Some(1_000)).await;

    let today = Utc::now().date_naive();
    let summary = ReportRepo::summary(&pool, today, today + Duration::days(30))
        .await
        .unwrap();
    assert_eq!(summary.vendor_count, 2);
    assert_eq!(summary.active_vendor_count, 1);
    assert_eq!(summary.active_contract_count, 1);
    assert_eq!(summary.expiring_contract_count, 0);
    assert_eq!(summary.document_count, 0);
    assert_eq!(summary.total_contract_value_minor, 1_000);
}
