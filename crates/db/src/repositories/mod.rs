//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod activity_log_repo;
pub mod contract_repo;
pub mod document_repo;
pub mod report_repo;
pub mod vendor_repo;

pub use activity_log_repo::ActivityLogRepo;
pub use contract_repo::ContractRepo;
pub use document_repo::DocumentRepo;
pub use report_repo::{RankTarget, ReportRepo, StatusSource};
pub use vendor_repo::VendorRepo;
