//! VendorHub domain core.
//!
//! Storage-free types and logic shared by the db, activity, and api crates:
//! the activity vocabulary, feed merge and formatting, expiry detection, and
//! dashboard bucketing. Nothing in here touches the database; callers pass
//! rows in.

pub mod activity;
pub mod aggregation;
pub mod error;
pub mod expiry;
pub mod feed;
pub mod pagination;
pub mod relative_time;
pub mod types;
