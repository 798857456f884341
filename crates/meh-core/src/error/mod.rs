//! Encapsulated errors.
//!
//! An encapsulated error wraps zero, one or many underlying causes together
//! with optional diagnostic details and optional explicit retry metadata.
//! From that it derives a retryability signal and a JSON rendering that
//! keeps the whole cause tree.
//!
//! # Key Types
//!
//! - [`Encapsulated`] - behaviour shared by every error variant
//! - [`EncapsulatedError`] - the generic variant raised by application code
//! - [`DependencyInjectionError`] - raised by the registry on misuse, never retryable
//! - [`Cause`] / [`Reason`] - the cause tree
//!
//! # Retryability
//!
//! 1. An explicit [`Retry::retryable`](crate::retry::Retry) always wins.
//! 2. Otherwise the error is retryable iff every reason is itself an
//!    encapsulated error that is retryable. A foreign cause, or no cause at
//!    all, makes the error non-retryable.
//!
//! ```rust
//! use meh_core::error::{Encapsulated, EncapsulatedError};
//! use meh_core::retry::Retry;
//!
//! let bare = EncapsulatedError::new("m");
//! assert!(!bare.is_retryable());
//!
//! let forced = EncapsulatedError::new("m").with_retry(Retry::retryable(true));
//! assert!(forced.is_retryable());
//!
//! let foreign = EncapsulatedError::new("m")
//!     .with_reason(std::io::Error::other("plain"));
//! assert!(!foreign.is_retryable());
//! ```

mod encapsulated;
mod injection;
mod reason;
mod render;

pub use encapsulated::EncapsulatedError;
pub use injection::DependencyInjectionError;
pub use reason::{Cause, Reason};

use crate::retry::Retry;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::backtrace::Backtrace;

/// Result type alias for operations that fail with an encapsulated error.
pub type Result<T, E = EncapsulatedError> = std::result::Result<T, E>;

/// Behaviour shared by every encapsulated error variant.
///
/// Variants supply their parts; the derived operations ([`is_retryable`],
/// [`render`], [`stack`]) have default implementations that walk the
/// cause tree through this trait, so nested variants dispatch to their own
/// overrides.
///
/// [`is_retryable`]: Encapsulated::is_retryable
/// [`render`]: Encapsulated::render
/// [`stack`]: Encapsulated::stack
pub trait Encapsulated: std::error::Error + Send + Sync + 'static {
    /// Display name of the concrete variant.
    fn name(&self) -> &'static str;

    /// Human-readable message.
    fn message(&self) -> &str;

    /// Underlying cause(s).
    fn causes(&self) -> &Cause;

    /// Structured diagnostic context, if any was attached.
    fn details(&self) -> Option<&Value>;

    /// Explicit retry metadata, if any was attached.
    fn retry(&self) -> Option<&Retry>;

    /// Backtrace captured at construction.
    fn backtrace(&self) -> &Backtrace;

    /// Earliest retry time, taken from the retry metadata.
    fn next_retry(&self) -> Option<DateTime<Utc>> {
        self.retry().and_then(|retry| retry.next_retry)
    }

    /// Whether the failed operation may be retried.
    ///
    /// Computed on every call, never cached.
    fn is_retryable(&self) -> bool {
        derive_retryable(self)
    }

    /// Debug trace, headed by `"<Name>: <message>"`.
    fn stack(&self) -> String {
        format!("{}: {}\n{}", self.name(), self.message(), self.backtrace())
    }

    /// JSON rendering of this error and its whole cause tree.
    ///
    /// Always contains `name`, `message`, `stack` and `retryable`; `reason`,
    /// `details` and `nextRetry` appear only when supplied at construction.
    fn render(&self) -> Value {
        render::to_json(self)
    }
}

/// Explicit retry metadata first, then the conjunction over the causes.
fn derive_retryable<E>(err: &E) -> bool
where
    E: Encapsulated + ?Sized,
{
    if let Some(explicit) = err.retry().and_then(|retry| retry.retryable) {
        return explicit;
    }

    match err.causes() {
        // An absent cause counts as one non-encapsulated reason.
        Cause::None => false,
        cause => cause.reasons().iter().all(Reason::is_retryable),
    }
}
