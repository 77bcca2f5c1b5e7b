//! Route definitions for the audit log and the composed feed.

use axum::routing::get;
use axum::Router;

use crate::handlers::activity;
use crate::state::AppState;

/// Activity routes mounted at `/activity`.
///
/// ```text
/// GET  /        -> query_activity_logs
/// GET  /feed    -> feed
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(activity::query_activity_logs))
        .route("/feed", get(activity::feed))
}
