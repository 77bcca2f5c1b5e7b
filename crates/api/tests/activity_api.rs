//! Audit log query and activity feed endpoints.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, get, post_json};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_store_gives_empty_feed(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/activity/feed").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"], serde_json::json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn feed_shows_logged_creation_once(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/vendors",
        serde_json::json!({"name": "Acme"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get(common::build_test_app(pool), "/api/v1/activity/feed").await;
    let items = body_json(response).await["data"].clone();
    let items = items.as_array().unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["origin"], "logged");
    assert_eq!(items[0]["description"], "New vendor added: Acme");
    assert_eq!(items[0]["relative_time"], "just now");
    assert_eq!(items[0]["subjects"][0]["name"], "Acme");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn feed_includes_expiring_contract(pool: PgPool) {
    let end = (Utc::now() + Duration::days(10)).date_naive();
    sqlx::query("INSERT INTO contracts (title, end_date) VALUES ('Freight', $1)")
        .bind(end)
        .execute(&pool)
        .await
        .unwrap();

    let response = get(common::build_test_app(pool), "/api/v1/activity/feed?limit=10").await;
    let items = body_json(response).await["data"].clone();
    let expiring: Vec<_> = items
        .as_array()
        .unwrap()
        .iter()
        .filter(|i| i["activity_type"] == "contract_expiring")
        .collect();

    assert_eq!(expiring.len(), 1);
    assert_eq!(expiring[0]["origin"], "synthesized");
    let description = expiring[0]["description"].as_str().unwrap();
    assert!(description.starts_with("Contract Freight expires in "), "{description}");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn feed_respects_since(pool: PgPool) {
    sqlx::query("INSERT INTO vendors (name, created_at) VALUES ('Old', NOW() - INTERVAL '3 days')")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO vendors (name) VALUES ('New')")
        .execute(&pool)
        .await
        .unwrap();

    let since = (Utc::now() - Duration::days(1)).format("%Y-%m-%dT%H:%M:%SZ");
    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/activity/feed?since={since}"),
    )
    .await;
    let items = body_json(response).await["data"].clone();
    let names: Vec<&str> = items
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["subjects"][0]["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["New"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn activity_query_filters_by_type_and_paginates(pool: PgPool) {
    for name in ["A", "B", "C"] {
        post_json(
            common::build_test_app(pool.clone()),
            "/api/v1/vendors",
            serde_json::json!({"name": name}),
        )
        .await;
    }
    post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/contracts",
        serde_json::json!({"title": "Freight"}),
    )
    .await;

    let response = get(
        common::build_test_app(pool.clone()),
        "/api/v1/activity?activity_type=entity_created&limit=2",
    )
    .await;
    let page = body_json(response).await["data"].clone();
    assert_eq!(page["total"], 4);
    assert_eq!(page["items"].as_array().unwrap().len(), 2);
    assert_eq!(page["items"][0]["description"], "New contract added: Freight");

    let response = get(
        common::build_test_app(pool),
        "/api/v1/activity?activity_type=entity_created&limit=2&offset=2",
    )
    .await;
    let page = body_json(response).await["data"].clone();
    assert_eq!(page["items"][0]["description"], "New vendor added: B");
    assert_eq!(page["items"][1]["description"], "New vendor added: A");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn activity_query_rejects_unknown_type(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/activity?activity_type=bogus").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
