use axum::routing::{get, post};
use axum::Router;

use crate::handlers::vendor;
use crate::state::AppState;

/// Routes mounted at `/vendors`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// POST   /{id}/rating   -> rate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(vendor::list).post(vendor::create))
        .route(
            "/{id}",
            get(vendor::get_by_id)
                .put(vendor::update)
                .delete(vendor::delete),
        )
        .route("/{id}/rating", post(vendor::rate))
}
