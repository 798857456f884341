use super::{Cause, Encapsulated, Reason, derive_retryable, render};
use crate::retry::Retry;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::backtrace::Backtrace;
use std::fmt;

/// Error that encapsulates other errors and extra context to aid debugging.
///
/// Built once and never mutated afterwards: the consuming `with_*` methods
/// are part of construction.
///
/// # Example
///
/// ```
/// use meh_core::error::{Encapsulated, EncapsulatedError};
/// use serde_json::json;
///
/// let err = EncapsulatedError::new("could not load user")
///     .with_reasons([
///         EncapsulatedError::new("cache miss"),
///         EncapsulatedError::new("db timeout"),
///     ])
///     .with_details(json!({"user_id": 42}));
///
/// assert_eq!(
///     err.to_string(),
///     "EncapsulatedError: could not load user [EncapsulatedError: cache miss; EncapsulatedError: db timeout]"
/// );
/// assert_eq!(err.render()["details"]["user_id"], 42);
/// ```
pub struct EncapsulatedError {
    name: &'static str,
    message: String,
    cause: Cause,
    details: Option<Value>,
    retry: Option<Retry>,
    never_retryable: bool,
    backtrace: Backtrace,
}

impl EncapsulatedError {
    pub(crate) const NAME: &'static str = "EncapsulatedError";

    /// Create an error with a message and nothing else.
    pub fn new(message: impl Into<String>) -> Self {
        Self::from_parts(message, Cause::None, None, None)
    }

    /// Create an error from all of its parts at once.
    ///
    /// `null` details are treated as absent.
    pub fn from_parts(
        message: impl Into<String>,
        cause: impl Into<Cause>,
        details: Option<Value>,
        retry: Option<Retry>,
    ) -> Self {
        Self::named(Self::NAME, message.into(), cause.into(), details, retry)
    }

    pub(crate) fn named(
        name: &'static str,
        message: String,
        cause: Cause,
        details: Option<Value>,
        retry: Option<Retry>,
    ) -> Self {
        Self {
            name,
            message,
            cause,
            details: details.filter(|value| !value.is_null()),
            retry,
            never_retryable: false,
            backtrace: Backtrace::capture(),
        }
    }

    /// Mark the error as never retryable. Survives later `with_retry` calls.
    pub(crate) fn pin_non_retryable(mut self) -> Self {
        self.never_retryable = true;
        self
    }

    /// Attach a single underlying cause, replacing any cause attached before.
    pub fn with_reason(self, reason: impl Into<Reason>) -> Self {
        self.with_cause(Cause::Single(reason.into()))
    }

    /// Attach an ordered list of underlying causes, replacing any cause
    /// attached before.
    pub fn with_reasons<I, R>(self, reasons: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Reason>,
    {
        self.with_cause(Cause::Multiple(reasons.into_iter().map(Into::into).collect()))
    }

    /// Attach a prepared cause, replacing any cause attached before.
    pub fn with_cause(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = cause.into();
        self
    }

    /// Attach structured diagnostic context.
    pub fn with_details(mut self, details: impl Into<Value>) -> Self {
        self.details = Some(details.into()).filter(|value| !value.is_null());
        self
    }

    /// Attach explicit retry metadata.
    pub fn with_retry(mut self, retry: Retry) -> Self {
        self.retry = Some(retry);
        self
    }
}

impl Encapsulated for EncapsulatedError {
    fn name(&self) -> &'static str {
        self.name
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn causes(&self) -> &Cause {
        &self.cause
    }

    fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    fn retry(&self) -> Option<&Retry> {
        self.retry.as_ref()
    }

    fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    fn is_retryable(&self) -> bool {
        !self.never_retryable && derive_retryable(self)
    }
}

impl fmt::Display for EncapsulatedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render::fmt_display(self, f)
    }
}

impl fmt::Debug for EncapsulatedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(self.name)
            .field("message", &self.message)
            .field("cause", &self.cause)
            .field("details", &self.details)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl std::error::Error for EncapsulatedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.reasons().first().map(Reason::as_error)
    }
}

impl Serialize for EncapsulatedError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.render().serialize(serializer)
    }
}
