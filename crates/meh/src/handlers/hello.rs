//! The hello handler.

use crate::dependencies::Dependencies;
use crate::util::string::yup;
use meh_core::{Container, Result};

/// Handle a request.
///
/// # Errors
///
/// Propagates every failure of [`yup`] unchanged.
#[tracing::instrument(skip(deps))]
pub fn handler(deps: &Container<Dependencies>) -> Result<String> {
    yup(deps)
}
