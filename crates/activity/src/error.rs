//! Error types for the recorder, the feed, and the reporter.

use std::time::Duration;

use vendorhub_core::error::CoreError;

/// Failure to append an activity log entry.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("Invalid activity: {0}")]
    Validation(String),

    #[error("Failed to encode activity: {0}")]
    Encode(String),

    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Store did not respond within {0:?}")]
    Timeout(Duration),
}

impl From<CoreError> for WriteError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => WriteError::Validation(msg),
            other => WriteError::Encode(other.to_string()),
        }
    }
}

/// Failure of a single feed source or name lookup.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Store did not respond within {0:?}")]
    Timeout(Duration),

    #[error("Undecodable row: {0}")]
    Decode(String),
}

/// Failure of a whole feed composition.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("{0}")]
    Validation(String),

    #[error("All {failed} feed sources failed")]
    AllSourcesFailed { failed: usize },
}

impl From<CoreError> for FeedError {
    fn from(err: CoreError) -> Self {
        FeedError::Validation(validation_message(err))
    }
}

/// Failure of a dashboard report. Never replaced with fabricated data.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("{0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Store did not respond within {0:?}")]
    Timeout(Duration),
}

impl From<CoreError> for ReportError {
    fn from(err: CoreError) -> Self {
        ReportError::Validation(validation_message(err))
    }
}

fn validation_message(err: CoreError) -> String {
    match err {
        CoreError::Validation(msg) => msg,
        other => other.to_string(),
    }
}
