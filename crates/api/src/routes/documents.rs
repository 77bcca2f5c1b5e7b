use axum::routing::get;
use axum::Router;

use crate::handlers::document;
use crate::state::AppState;

/// Routes mounted at `/documents`.
///
/// ```text
/// GET    /        -> list (?vendor_id=)
/// POST   /        -> register
/// GET    /{id}    -> get_by_id
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(document::list).post(document::register))
        .route("/{id}", get(document::get_by_id).delete(document::delete))
}
