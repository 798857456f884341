use super::{Cause, Encapsulated, EncapsulatedError, render};
use crate::retry::Retry;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::backtrace::Backtrace;
use std::fmt;

/// Misuse of the dependency registry. Never retryable.
pub struct DependencyInjectionError(EncapsulatedError);

impl DependencyInjectionError {
    pub(crate) const NAME: &'static str = "DependencyInjectionError";

    /// Create an error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(EncapsulatedError::named(
            Self::NAME,
            message.into(),
            Cause::None,
            None,
            None,
        )
        .pin_non_retryable())
    }

    /// Attach structured diagnostic context.
    pub fn with_details(self, details: impl Into<Value>) -> Self {
        Self(self.0.with_details(details))
    }
}

impl Encapsulated for DependencyInjectionError {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn message(&self) -> &str {
        self.0.message()
    }

    fn causes(&self) -> &Cause {
        self.0.causes()
    }

    fn details(&self) -> Option<&Value> {
        self.0.details()
    }

    fn retry(&self) -> Option<&Retry> {
        self.0.retry()
    }

    fn backtrace(&self) -> &Backtrace {
        self.0.backtrace()
    }

    fn is_retryable(&self) -> bool {
        false
    }
}

/// Folds the variant into the generic error type so it can travel through
/// `Result<T, EncapsulatedError>`. The display name is kept and retryability
/// stays pinned to `false`, whatever retry metadata is attached later.
impl From<DependencyInjectionError> for EncapsulatedError {
    fn from(err: DependencyInjectionError) -> Self {
        err.0
    }
}

impl fmt::Display for DependencyInjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render::fmt_display(self, f)
    }
}

impl fmt::Debug for DependencyInjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl std::error::Error for DependencyInjectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.0)
    }
}

impl Serialize for DependencyInjectionError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.render().serialize(serializer)
    }
}
