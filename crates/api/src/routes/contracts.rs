use axum::routing::get;
use axum::Router;

use crate::handlers::contract;
use crate::state::AppState;

/// Routes mounted at `/contracts`.
///
/// ```text
/// GET    /        -> list (?vendor_id=)
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(contract::list).post(contract::create))
        .route(
            "/{id}",
            get(contract::get_by_id)
                .put(contract::update)
                .delete(contract::delete),
        )
}
