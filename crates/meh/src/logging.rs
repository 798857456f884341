//! Logger factory and subscriber setup.
//!
//! Every logger is a [`TracingLogger`] named after the application, with an
//! optional child segment (`meh`, `meh/db`, ...). Output format and level
//! come from [`LogConfig`].

use crate::config::LogConfig;
use meh_core::logger::Level;
use meh_core::{EncapsulatedError, Reason, Result, TracingLogger};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Name of the root logger.
pub const LOGGER_DEFAULT_NAME: &str = "meh";

/// Environment variable holding an `EnvFilter` directive that overrides the
/// configured level.
pub const LOG_FILTER_ENV: &str = "MEH_LOG";

/// Get a logger: the root logger for an empty name, a child otherwise.
pub fn get_logger(name: &str) -> TracingLogger {
    let root = TracingLogger::new(LOGGER_DEFAULT_NAME);
    if name.is_empty() { root } else { root.child(name) }
}

/// Parse a level name.
///
/// # Errors
///
/// Fails for anything other than trace, debug, info, warn(ing), error or fatal.
pub fn parse_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" | "fatal" => Ok(Level::ERROR),
        _ => Err(EncapsulatedError::new(format!(
            "Invalid log level: {level}. Use trace, debug, info, warn, or error"
        ))
        .with_details(json!({ "level": level }))),
    }
}

/// Install the global `tracing` subscriber described by `config`.
///
/// JSON lines unless `pretty_print` is set; no timestamps unless `timestamp`
/// is set. `MEH_LOG` takes precedence over the configured level.
///
/// # Errors
///
/// Fails for an invalid level, or when a global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let level = parse_level(&config.level)?;
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    // The formatter types differ per combination, hence one branch each.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    let installed = match (config.pretty_print, config.timestamp) {
        (true, true) => builder.pretty().try_init(),
        (true, false) => builder.pretty().without_time().try_init(),
        (false, true) => builder.json().try_init(),
        (false, false) => builder.json().without_time().try_init(),
    };

    installed.map_err(|err| {
        EncapsulatedError::new("Failed to initialize logging").with_reason(Reason::Foreign(err))
    })?;

    debug!(level = %level, pretty = config.pretty_print, "Logging initialized");
    Ok(())
}
