//! Limit/offset handling shared by list, feed, and report endpoints.

use crate::error::CoreError;

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_LIMIT: i64 = 50;

/// Maximum page size for list endpoints.
pub const MAX_PAGE_LIMIT: i64 = 500;

/// Clamp an optional user-provided limit into `[1, max]`.
///
/// For list endpoints where a bad limit is harmless.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Validate an optional limit for feed and report calls.
///
/// Unlike [`clamp_limit`], a zero or negative limit is rejected rather than
/// silently corrected. Values above `max` are capped.
pub fn validate_limit(limit: Option<i64>, default: i64, max: i64) -> Result<usize, CoreError> {
    let limit = limit.unwrap_or(default);
    if limit < 1 {
        return Err(CoreError::validation(format!(
            "limit must be a positive integer, got {limit}"
        )));
    }
    Ok(limit.min(max) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_limit_uses_default_when_none() {
        assert_eq!(clamp_limit(None, 20, 100), 20);
    }

    #[test]
    fn clamp_limit_respects_bounds() {
        assert_eq!(clamp_limit(Some(200), 20, 100), 100);
        assert_eq!(clamp_limit(Some(-5), 20, 100), 1);
    }

    #[test]
    fn clamp_offset_floors_at_zero() {
        assert_eq!(clamp_offset(Some(-10)), 0);
        assert_eq!(clamp_offset(None), 0);
    }

    #[test]
    fn validate_limit_rejects_negative_and_zero() {
        assert!(matches!(validate_limit(Some(-1), 10, 200), Err(CoreError::Validation(_))));
        assert!(validate_limit(Some(0), 10, 200).is_err());
    }

    #[test]
    fn validate_limit_caps_at_max() {
        assert_eq!(validate_limit(Some(1000), 10, 200).unwrap(), 200);
        assert_eq!(validate_limit(None, 10, 200).unwrap(), 10);
    }
}
