use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Dashboard routes mounted at `/dashboard`.
///
/// ```text
/// GET  /summary       -> summary
/// GET  /status        -> status_distribution
/// GET  /categories    -> category_distribution
/// GET  /top           -> top_n
/// GET  /spend         -> spend_by_vendor
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(dashboard::summary))
        .route("/status", get(dashboard::status_distribution))
        .route("/categories", get(dashboard::category_distribution))
        .route("/top", get(dashboard::top_n))
        .route("/spend", get(dashboard::spend_by_vendor))
}
