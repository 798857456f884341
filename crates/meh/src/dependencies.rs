//! Dependency schema and composition root.

use crate::logging::get_logger;
use meh_core::{Container, Result, SharedLogger, dependency_schema};
use std::sync::Arc;
use tracing::debug;

dependency_schema! {
    /// Registry of recognised dependencies.
    ///
    /// The container can only be used with the keys declared here.
    pub Dependencies {
        /// Structured logger shared by the handlers.
        LoggerKey("logger") => SharedLogger,
    }
}

/// Build the container with every dependency the handlers need.
///
/// # Errors
///
/// Fails if a dependency is wired twice.
pub fn bootstrap() -> Result<Container<Dependencies>> {
    let deps = Container::new();

    let logger: SharedLogger = Arc::new(get_logger(""));
    deps.inject::<LoggerKey>(logger)?;

    debug!(injected = ?deps.injected(), "Dependencies wired");
    Ok(deps)
}
