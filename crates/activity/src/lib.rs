//! VendorHub activity pipeline.
//!
//! - [`ActivityRecorder`] appends one immutable `activity_logs` row per
//!   tracked mutation. Callers use the best-effort variant so a failed
//!   append never fails the mutation itself.
//! - [`FeedComposer`] merges the audit log, implicit activity inferred from
//!   entity timestamps, and live contract-expiry warnings into one feed.
//! - [`Reporter`] computes dashboard rollups, preferring server-side SQL
//!   functions and falling back to an in-process scan.

pub mod error;
pub mod feed;
pub mod recorder;
pub mod reporter;

mod bounded;

pub use error::{FeedError, FetchError, ReportError, WriteError};
pub use feed::{FeedComposer, FeedSettings, FeedSource, NameResolver};
pub use recorder::{ActivityRecorder, NewActivity};
pub use reporter::Reporter;
