//! Request handlers.
//!
//! Entity handlers (vendor, contract, document) delegate to the repositories
//! in `vendorhub_db` and record one activity per successful mutation through
//! the best-effort recorder, so a failed append never fails the request.
//! Activity and dashboard handlers delegate to the services in
//! `vendorhub_activity`.

pub mod activity;
pub mod contract;
pub mod dashboard;
pub mod document;
pub mod vendor;

use vendorhub_core::error::CoreError;
use vendorhub_core::types::DbId;

use crate::error::AppError;

fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}
