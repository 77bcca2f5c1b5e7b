//! Error envelope and authentication behaviour.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_unauthenticated, post_json};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_token_returns_401_envelope(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_unauthenticated(app, "/api/v1/vendors").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert!(json["error"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_vendor_returns_404_envelope(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/vendors/999999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Vendor with id 999999 not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_payload_returns_validation_error(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/vendors",
        serde_json::json!({"name": "", "contact_email": "not-an-email"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn contract_for_missing_vendor_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/contracts",
        serde_json::json!({"title": "Orphan", "vendor_id": 424242}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_storage_path_conflicts(pool: PgPool) {
    let doc = serde_json::json!({
        "file_name": "w9.pdf",
        "storage_path": "vendors/1/w9.pdf",
        "content_type": "application/pdf",
        "file_size": 2048,
    });
    let first = post_json(common::build_test_app(pool.clone()), "/api/v1/documents", doc.clone()).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json(common::build_test_app(pool), "/api/v1/documents", doc).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn zero_feed_limit_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/activity/feed?limit=0").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}
