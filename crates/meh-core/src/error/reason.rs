use super::{DependencyInjectionError, Encapsulated, EncapsulatedError};
use std::error::Error;
use std::fmt;

/// A single underlying cause.
#[derive(Debug)]
pub enum Reason {
    /// Another encapsulated error; takes part in retry derivation.
    Encapsulated(Box<dyn Encapsulated>),

    /// Any other error; always non-retryable.
    Foreign(Box<dyn Error + Send + Sync>),
}

impl Reason {
    /// Wrap an encapsulated error.
    pub fn encapsulated(err: impl Encapsulated) -> Self {
        Self::Encapsulated(Box::new(err))
    }

    /// Wrap a foreign error.
    pub fn foreign(err: impl Error + Send + Sync + 'static) -> Self {
        Self::Foreign(Box::new(err))
    }

    /// Whether this reason counts towards a retryable parent.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Encapsulated(err) => err.is_retryable(),
            Self::Foreign(_) => false,
        }
    }

    /// The encapsulated error, if this reason is one.
    pub fn as_encapsulated(&self) -> Option<&dyn Encapsulated> {
        match self {
            Self::Encapsulated(err) => Some(err.as_ref()),
            Self::Foreign(_) => None,
        }
    }

    /// View this reason as a plain `std::error::Error`.
    pub fn as_error(&self) -> &(dyn Error + 'static) {
        match self {
            Self::Encapsulated(err) => &**err,
            Self::Foreign(err) => &**err,
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encapsulated(err) => fmt::Display::fmt(err, f),
            Self::Foreign(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl From<EncapsulatedError> for Reason {
    fn from(err: EncapsulatedError) -> Self {
        Self::encapsulated(err)
    }
}

impl From<DependencyInjectionError> for Reason {
    fn from(err: DependencyInjectionError) -> Self {
        Self::encapsulated(err)
    }
}

impl From<Box<dyn Encapsulated>> for Reason {
    fn from(err: Box<dyn Encapsulated>) -> Self {
        Self::Encapsulated(err)
    }
}

/// Encapsulated errors hidden behind the box are recovered; anything else
/// stays foreign.
impl From<Box<dyn Error + Send + Sync>> for Reason {
    fn from(err: Box<dyn Error + Send + Sync>) -> Self {
        let err = match err.downcast::<EncapsulatedError>() {
            Ok(err) => return Self::Encapsulated(err),
            Err(err) => err,
        };

        match err.downcast::<DependencyInjectionError>() {
            Ok(err) => Self::Encapsulated(err),
            Err(err) => Self::Foreign(err),
        }
    }
}

/// Encapsulated errors carried by the `anyhow::Error` are recovered;
/// anything else stays foreign.
impl From<anyhow::Error> for Reason {
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<EncapsulatedError>() {
            Ok(err) => return Self::encapsulated(err),
            Err(err) => err,
        };

        match err.downcast::<DependencyInjectionError>() {
            Ok(err) => Self::encapsulated(err),
            Err(err) => Self::Foreign(err.into()),
        }
    }
}

impl From<std::io::Error> for Reason {
    fn from(err: std::io::Error) -> Self {
        Self::foreign(err)
    }
}

impl From<serde_json::Error> for Reason {
    fn from(err: serde_json::Error) -> Self {
        Self::foreign(err)
    }
}

/// The underlying cause(s) of an encapsulated error.
#[derive(Debug, Default)]
pub enum Cause {
    /// No cause was supplied.
    #[default]
    None,

    /// Exactly one cause.
    Single(Reason),

    /// An ordered list of causes, possibly empty.
    Multiple(Vec<Reason>),
}

impl Cause {
    /// Whether no cause was supplied.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The causes as a list; a single cause becomes a one-element slice.
    pub fn reasons(&self) -> &[Reason] {
        match self {
            Self::None => &[],
            Self::Single(reason) => std::slice::from_ref(reason),
            Self::Multiple(reasons) => reasons,
        }
    }
}

impl From<Reason> for Cause {
    fn from(reason: Reason) -> Self {
        Self::Single(reason)
    }
}

impl From<Vec<Reason>> for Cause {
    fn from(reasons: Vec<Reason>) -> Self {
        Self::Multiple(reasons)
    }
}

impl From<Option<Reason>> for Cause {
    fn from(reason: Option<Reason>) -> Self {
        reason.map_or(Self::None, Self::Single)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::Retry;

    #[test]
    fn test_single_cause_normalises_to_one_element() {
        let cause = Cause::from(Reason::foreign(std::io::Error::other("x")));
        assert_eq!(cause.reasons().len(), 1);
        assert!(!cause.is_none());
    }

    #[test]
    fn test_absent_cause_has_no_reasons() {
        let cause = Cause::from(None::<Reason>);
        assert!(cause.is_none());
        assert!(cause.reasons().is_empty());
    }

    #[test]
    fn test_reason_retryability() {
        let foreign = Reason::from(std::io::Error::other("plain"));
        assert!(!foreign.is_retryable());
        assert!(foreign.as_encapsulated().is_none());

        let inner = EncapsulatedError::new("inner").with_retry(Retry::retryable(true));
        let retryable = Reason::from(inner);
        assert!(retryable.is_retryable());
        assert_eq!(
            retryable.as_encapsulated().map(|e| e.name()),
            Some("EncapsulatedError")
        );
    }

    #[test]
    fn test_anyhow_reason_is_foreign() {
        let reason = Reason::from(anyhow::anyhow!("boom"));
        assert!(matches!(reason, Reason::Foreign(_)));
        assert_eq!(reason.to_string(), "boom");
    }

    fn retryable_inner() -> EncapsulatedError {
        EncapsulatedError::new("inner").with_retry(Retry::retryable(true))
    }

    #[test]
    fn test_anyhow_wrapped_encapsulated_error_is_recovered() {
        let reason = Reason::from(anyhow::Error::from(retryable_inner()));
        assert!(reason.is_retryable());
        assert_eq!(reason.as_encapsulated().map(|e| e.message()), Some("inner"));

        let outer = EncapsulatedError::new("outer")
            .with_reason(anyhow::Error::from(retryable_inner()));
        assert!(outer.is_retryable());
        assert_eq!(outer.render()["reason"]["message"], "inner");
    }

    #[test]
    fn test_boxed_encapsulated_error_is_recovered() {
        let boxed: Box<dyn Error + Send + Sync> = Box::new(retryable_inner());
        let outer = EncapsulatedError::new("outer").with_reason(boxed);
        assert!(outer.is_retryable());
        assert!(outer.render()["reason"].is_object());
    }

    #[test]
    fn test_wrapped_injection_error_is_recovered() {
        let wrapped = anyhow::Error::from(DependencyInjectionError::new("missing"));
        let reason = Reason::from(wrapped);
        assert_eq!(
            reason.as_encapsulated().map(|e| e.name()),
            Some("DependencyInjectionError")
        );
        assert!(!reason.is_retryable());

        let boxed: Box<dyn Error + Send + Sync> = Box::new(DependencyInjectionError::new("m"));
        assert!(Reason::from(boxed).as_encapsulated().is_some());
    }

    #[test]
    fn test_boxed_foreign_error_stays_foreign() {
        let boxed: Box<dyn Error + Send + Sync> = Box::new(std::io::Error::other("plain"));
        assert!(matches!(Reason::from(boxed), Reason::Foreign(_)));
    }
}
