//! Explicit retry metadata.
//!
//! This module only describes *whether* and *when* a failed operation may be
//! retried. Scheduling the retry is left to the caller.
//!
//! # Examples
//!
//! ```rust
//! use meh_core::retry::Retry;
//! use chrono::{Duration, Utc};
//!
//! let at = Utc::now() + Duration::seconds(30);
//! let retry = Retry::retryable(true).with_next_retry(at);
//!
//! assert!(retry.is_explicit());
//! assert_eq!(retry.next_retry, Some(at));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Explicit retry override attached to an error at construction.
///
/// When `retryable` is `Some`, it replaces the retryability that would
/// otherwise be derived from the error's causes. A `Retry` carrying only a
/// `next_retry` timestamp leaves the derivation in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Retry {
    /// Explicit retryability, `None` when not supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,

    /// Earliest time at which a retry makes sense.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_retry: Option<DateTime<Utc>>,
}

impl Retry {
    /// Create an empty record that overrides nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record with an explicit retryability.
    pub fn retryable(retryable: bool) -> Self {
        Self {
            retryable: Some(retryable),
            next_retry: None,
        }
    }

    /// Shorthand for `Retry::retryable(false)`.
    pub fn not_retryable() -> Self {
        Self::retryable(false)
    }

    /// Set the earliest retry time.
    pub fn with_next_retry(mut self, at: DateTime<Utc>) -> Self {
        self.next_retry = Some(at);
        self
    }

    /// Whether an explicit retryability was supplied.
    pub fn is_explicit(&self) -> bool {
        self.retryable.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_is_not_explicit() {
        let retry = Retry::new();
        assert!(!retry.is_explicit());
        assert_eq!(retry.next_retry, None);
    }

    #[test]
    fn test_constructors() {
        assert_eq!(Retry::retryable(true).retryable, Some(true));
        assert_eq!(Retry::not_retryable().retryable, Some(false));
    }

    #[test]
    fn test_next_retry_alone_is_not_explicit() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let retry = Retry::new().with_next_retry(at);
        assert!(!retry.is_explicit());
        assert_eq!(retry.next_retry, Some(at));
    }

    #[test]
    fn test_serializes_camel_case() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let value = serde_json::to_value(Retry::retryable(true).with_next_retry(at)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"retryable": true, "nextRetry": "2024-01-02T03:04:05Z"})
        );

        let empty = serde_json::to_value(Retry::new()).unwrap();
        assert_eq!(empty, serde_json::json!({}));
    }

    #[test]
    fn test_deserializes_partial_record() {
        let retry: Retry = serde_json::from_str(r#"{"retryable": false}"#).unwrap();
        assert_eq!(retry, Retry::not_retryable());
    }
}
