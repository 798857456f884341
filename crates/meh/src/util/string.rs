use crate::dependencies::{Dependencies, LoggerKey};
use meh_core::{Container, EncapsulatedError, Result};

/// Environment variable that makes [`yup`] fail when set to a non-empty value.
pub const FAIL_ENV: &str = "FAIL";

/// Say "yup", or fail on demand.
///
/// # Errors
///
/// Fails when no logger has been injected, or when `FAIL` is set.
pub fn yup(deps: &Container<Dependencies>) -> Result<String> {
    let logger = deps.get::<LoggerKey>()?;

    if should_fail() {
        logger.warn("danger");
        return Err(EncapsulatedError::new("meh"));
    }

    logger.info("returning yup");
    Ok(["y", "u", "p"].concat())
}

fn should_fail() -> bool {
    std::env::var_os(FAIL_ENV).is_some_and(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use meh_core::Encapsulated;

    #[test]
    fn test_missing_logger_is_reported() {
        let deps = Container::<Dependencies>::new();
        let err = yup(&deps).unwrap_err();

        assert_eq!(err.name(), "DependencyInjectionError");
        assert_eq!(err.message(), "Dependency logger not found");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_empty_fail_does_not_fail() {
        temp_env::with_var(FAIL_ENV, Some(""), || assert!(!should_fail()));
        temp_env::with_var(FAIL_ENV, Some("1"), || assert!(should_fail()));
        temp_env::with_var_unset(FAIL_ENV, || assert!(!should_fail()));
    }
}
