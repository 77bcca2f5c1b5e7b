//! Integration tests for vendor, contract, and document repositories.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use vendorhub_db::models::contract::CreateContract;
use vendorhub_db::models::document::CreateDocument;
use vendorhub_db::models::vendor::{CreateVendor, UpdateVendor};
use vendorhub_db::repositories::{ContractRepo, DocumentRepo, VendorRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_vendor(name: &str) -> CreateVendor {
    CreateVendor {
        name: name.to_string(),
        category: Some("Logistics".into()),
        status: Some("active".into()),
        performance_score: None,
        contact_email: None,
    }
}

fn new_contract(vendor_id: Option<i64>, title: &str) -> CreateContract {
    CreateContract {
        vendor_id,
        title: title.to_string(),
        status: Some("active".into()),
        value_minor: Some(100_000),
        start_date: None,
        end_date: None,
    }
}

fn new_document(path: &str) -> CreateDocument {
    CreateDocument {
        vendor_id: None,
        contract_id: None,
        file_name: "agreement.pdf".into(),
        storage_path: path.to_string(),
        content_type: "application/pdf".into(),
        file_size: 2048,
    }
}

// ---------------------------------------------------------------------------
// Vendors
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_vendor_update_applies_only_given_fields(pool: PgPool) {
    let vendor = VendorRepo::create(&pool, &new_vendor("Acme")).await.unwrap();

    let update = UpdateVendor {
        status: Some("inactive".into()),
        ..Default::default()
    };
    let updated = VendorRepo::update(&pool, vendor.id, &update).await.unwrap().unwrap();
    assert_eq!(updated.status.as_deref(), Some("inactive"));
    assert_eq!(updated.category.as_deref(), Some("Logistics"));
    assert_eq!(updated.name, "Acme");

    assert!(VendorRepo::update(&pool, 9999, &update).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_vendor_rating_out_of_range_is_rejected(pool: PgPool) {
    let vendor = VendorRepo::create(&pool, &new_vendor("Acme")).await.unwrap();
    let rated = VendorRepo::set_rating(&pool, vendor.id, 4.5).await.unwrap().unwrap();
    assert_eq!(rated.rating, Some(4.5));

    assert!(VendorRepo::set_rating(&pool, vendor.id, 6.0).await.is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_names_skips_missing_ids(pool: PgPool) {
    let a = VendorRepo::create(&pool, &new_vendor("Acme")).await.unwrap();
    let b = VendorRepo::create(&pool, &new_vendor("Globex")).await.unwrap();

    let mut names = VendorRepo::find_names(&pool, &[a.id, b.id, 424_242]).await.unwrap();
    names.sort_by_key(|n| n.id);
    assert_eq!(names.len(), 2);
    assert_eq!(names[0].name, "Acme");
    assert_eq!(names[1].name, "Globex");

    assert!(VendorRepo::find_names(&pool, &[]).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_vendor_keeps_contract_with_null_vendor(pool: PgPool) {
    let vendor = VendorRepo::create(&pool, &new_vendor("Acme")).await.unwrap();
    let contract = ContractRepo::create(&pool, &new_contract(Some(vendor.id), "Freight"))
        .await
        .unwrap();

    let deleted = VendorRepo::delete(&pool, vendor.id).await.unwrap().unwrap();
    assert_eq!(deleted.name, "Acme");

    let orphan = ContractRepo::find_by_id(&pool, contract.id).await.unwrap().unwrap();
    assert_eq!(orphan.vendor_id, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_ending_between_is_exclusive_inclusive(pool: PgPool) {
    let today = Utc::now().date_naive();
    for (title, offset) in [("today", 0), ("soon", 10), ("edge", 30), ("later", 31)] {
        let mut input = new_contract(None, title);
        input.end_date = Some(today + Duration::days(offset));
        ContractRepo::create(&pool, &input).await.unwrap();
    }

    let rows = ContractRepo::list_ending_between(&pool, today, today + Duration::days(30), 10)
        .await
        .unwrap();
    let titles: Vec<&str> = rows.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["soon", "edge"]);
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_storage_path_violates_unique(pool: PgPool) {
    DocumentRepo::create(&pool, &new_document("vendors/1/a.pdf"), Some(1))
        .await
        .unwrap();
    let err = DocumentRepo::create(&pool, &new_document("vendors/1/a.pdf"), Some(1))
        .await
        .unwrap_err();
    match err {
        sqlx::Error::Database(db) => {
            assert_eq!(db.code().as_deref(), Some("23505"));
            assert_eq!(db.constraint(), Some("uq_documents_storage_path"));
        }
        other => panic!("expected database error, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_document_list_filters_by_vendor(pool: PgPool) {
    let mut mine = new_document("a.pdf");
    mine.vendor_id = Some(5);
    DocumentRepo::create(&pool, &mine, None).await.unwrap();
    DocumentRepo::create(&pool, &new_document("b.pdf"), None).await.unwrap();

    assert_eq!(DocumentRepo::list(&pool, Some(5), 50, 0).await.unwrap().len(), 1);
    assert_eq!(DocumentRepo::list(&pool, None, 50, 0).await.unwrap().len(), 2);
}
