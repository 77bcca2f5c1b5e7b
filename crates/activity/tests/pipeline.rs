//! End-to-end tests of the recorder, feed, and reporter against Postgres.

use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use sqlx::PgPool;
use vendorhub_activity::{ActivityRecorder, FeedComposer, FeedSettings, NewActivity, Reporter};
use vendorhub_core::activity::{ActivityDetails, ActivityType, EntityKind, SubjectRef};
use vendorhub_core::feed::FeedOrigin;
use vendorhub_db::models::contract::CreateContract;
use vendorhub_db::models::vendor::CreateVendor;
use vendorhub_db::repositories::{ContractRepo, VendorRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const TIMEOUT: Duration = Duration::from_secs(5);

fn settings() -> FeedSettings {
    FeedSettings {
        store_timeout: TIMEOUT,
        sample_fallback: true,
    }
}

async fn create_vendor(pool: &PgPool, name: &str, category: Option<&str>) -> i64 {
    let input = CreateVendor {
        name: name.to_string(),
        category: category.map(str::to_string),
        status: Some("active".into()),
        performance_score: None,
        contact_email: None,
    };
    VendorRepo::create(pool, &input).await.unwrap().id
}

// ---------------------------------------------------------------------------
// Recorder
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_record_assigns_id_and_timestamp(pool: PgPool) {
    let recorder = ActivityRecorder::new(pool.clone(), TIMEOUT);
    let before = Utc::now() - ChronoDuration::seconds(5);

    let entry = recorder
        .record(NewActivity::new(
            ActivityDetails::EntityCreated {
                entity: EntityKind::Vendor,
                name: "Acme".into(),
            },
            vec![SubjectRef::vendor(1)],
            Some(9),
        ))
        .await
        .unwrap();

    assert!(entry.id > 0);
    assert!(entry.created_at >= before);
    assert_eq!(entry.activity_type(), ActivityType::EntityCreated);
    assert_eq!(entry.description, "New vendor added: Acme");
}

// ---------------------------------------------------------------------------
// Feed
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logged_creation_hides_inferred_duplicate(pool: PgPool) {
    let vendor_id = create_vendor(&pool, "Acme", None).await;
    let recorder = ActivityRecorder::new(pool.clone(), TIMEOUT);
    recorder
        .record(NewActivity::new(
            ActivityDetails::EntityCreated {
                entity: EntityKind::Vendor,
                name: "Acme".into(),
            },
            vec![SubjectRef::vendor(vendor_id)],
            Some(1),
        ))
        .await
        .unwrap();
    create_vendor(&pool, "Globex", None).await;

    let feed = FeedComposer::for_pool(pool.clone(), settings());
    let items = feed.compose(Some(10), None).await.unwrap();

    let origins: Vec<(String, FeedOrigin)> =
        items.iter().map(|i| (i.description.clone(), i.origin)).collect();
    assert_eq!(items.len(), 2, "{origins:?}");
    assert!(origins.contains(&("New vendor added: Acme".into(), FeedOrigin::Logged)));
    assert!(origins.contains(&("New vendor added: Globex".into(), FeedOrigin::Inferred)));
    assert_eq!(items.iter().find(|i| i.origin == FeedOrigin::Logged).unwrap().subjects[0].name, "Acme");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expiring_contract_is_synthesized(pool: PgPool) {
    let vendor_id = create_vendor(&pool, "Acme", None).await;
    let contract = ContractRepo::create(
        &pool,
        &CreateContract {
            vendor_id: Some(vendor_id),
            title: "Freight".into(),
            status: Some("active".into()),
            value_minor: None,
            start_date: None,
            end_date: Some(Utc::now().date_naive() + ChronoDuration::days(10)),
        },
    )
    .await
    .unwrap();

    let feed = FeedComposer::for_pool(pool.clone(), settings());
    let items = feed.compose(Some(20), None).await.unwrap();

    let expiry = items
        .iter()
        .find(|i| i.key == format!("expiry:{}", contract.id))
        .expect("expiry item");
    assert_eq!(expiry.activity_type, ActivityType::ContractExpiring);
    assert_eq!(expiry.origin, FeedOrigin::Synthesized);
    assert_eq!(expiry.subjects[1].name, "Acme");
    assert_eq!(expiry.description, "Contract Freight expires in 10 days");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dangling_reference_renders_placeholder(pool: PgPool) {
    let recorder = ActivityRecorder::new(pool.clone(), TIMEOUT);
    recorder
        .record(NewActivity::new(
            ActivityDetails::EntityDeleted {
                entity: EntityKind::Vendor,
                name: "Gone".into(),
            },
            vec![SubjectRef::vendor(424_242)],
            None,
        ))
        .await
        .unwrap();

    let feed = FeedComposer::for_pool(pool.clone(), settings());
    let items = feed.compose(None, None).await.unwrap();
    assert_eq!(items[0].subjects[0].name, "Unknown Vendor");
}

// ---------------------------------------------------------------------------
// Reporter
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_report_falls_back_to_scan(pool: PgPool) {
    create_vendor(&pool, "A", Some("IT")).await;
    create_vendor(&pool, "B", Some(" ")).await;
    create_vendor(&pool, "C", Some("IT ")).await;

    let reporter = Reporter::new(pool.clone(), TIMEOUT);
    let with_function = reporter.count_by_category().await.unwrap();

    sqlx::query("DROP FUNCTION vendor_category_distribution()")
        .execute(&pool)
        .await
        .unwrap();
    let scanned = reporter.count_by_category().await.unwrap();

    assert_eq!(with_function, scanned);
    assert_eq!(scanned.iter().map(|b| b.count).sum::<i64>(), 3);
    assert_eq!(scanned[0].label, "IT");
    assert_eq!(scanned[0].count, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_spend_report_falls_back_to_scan(pool: PgPool) {
    let a = create_vendor(&pool, "Vendor A", None).await;
    let b = create_vendor(&pool, "Vendor B", None).await;
    for (vendor_id, value) in [(a, 100_000), (b, 50_000), (a, 250_000)] {
        ContractRepo::create(
            &pool,
            &CreateContract {
                vendor_id: Some(vendor_id),
                title: "Service".into(),
                status: None,
                value_minor: Some(value),
                start_date: None,
                end_date: None,
            },
        )
        .await
        .unwrap();
    }

    let reporter = Reporter::new(pool.clone(), TIMEOUT);
    let direct = reporter.spend_by_vendor(Some(2)).await.unwrap();

    sqlx::query("DROP FUNCTION vendor_spend_totals()")
        .execute(&pool)
        .await
        .unwrap();
    let scanned = reporter.spend_by_vendor(Some(2)).await.unwrap();

    assert_eq!(direct, scanned);
    assert_eq!(scanned[0].label, "Vendor A");
    assert_eq!(scanned[0].total_display, 350.0);
    assert_eq!(scanned[1].total_display, 50.0);
}
