pub mod activity;
pub mod contracts;
pub mod dashboard;
pub mod documents;
pub mod health;
pub mod vendors;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Every route below requires a bearer token (enforced by the
/// [`AuthUser`](crate::middleware::auth::AuthUser) extractor).
///
/// ```text
/// /vendors                       list, create
/// /vendors/{id}                  get, update, delete
/// /vendors/{id}/rating           rate (POST)
///
/// /contracts                     list, create
/// /contracts/{id}                get, update, delete
///
/// /documents                     list (?vendor_id=), register upload
/// /documents/{id}                get, delete
///
/// /activity                      audit log query
/// /activity/feed                 composed activity feed
///
/// /dashboard/summary             headline counts
/// /dashboard/status              status distribution (?entity=)
/// /dashboard/categories          vendor category distribution
/// /dashboard/top                 top-N ranking (?entity=&field=&n=)
/// /dashboard/spend               spend per vendor (?n=)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/vendors", vendors::router())
        .nest("/contracts", contracts::router())
        .nest("/documents", documents::router())
        .nest("/activity", activity::router())
        .nest("/dashboard", dashboard::router())
}
