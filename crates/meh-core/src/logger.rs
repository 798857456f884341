//! Leveled logging capability.
//!
//! Application code depends on the [`Logger`] trait, usually fetched from a
//! dependency [`Container`](crate::registry::Container), rather than on any
//! particular log transport. [`TracingLogger`] is the implementation backed
//! by `tracing` events.

use crate::error::Encapsulated;
use std::sync::Arc;

pub use tracing::Level;

/// Shared, type-erased logger.
pub type SharedLogger = Arc<dyn Logger>;

/// A leveled logger.
///
/// Only [`log`](Logger::log) is required; the per-level helpers and
/// [`report`](Logger::report) forward to it.
pub trait Logger: Send + Sync {
    /// Emit `message` at `level`.
    fn log(&self, level: Level, message: &str);

    /// Emit at debug level.
    fn debug(&self, message: &str) {
        self.log(Level::DEBUG, message);
    }

    /// Emit at info level.
    fn info(&self, message: &str) {
        self.log(Level::INFO, message);
    }

    /// Emit at warn level.
    fn warn(&self, message: &str) {
        self.log(Level::WARN, message);
    }

    /// Emit at error level.
    fn error(&self, message: &str) {
        self.log(Level::ERROR, message);
    }

    /// Report an encapsulated error: its string form followed by its JSON rendering.
    fn report(&self, level: Level, error: &dyn Encapsulated) {
        self.log(level, &format!("{error} {}", error.render()));
    }
}

macro_rules! emit {
    ($level:expr, $($rest:tt)+) => {
        match $level {
            Level::ERROR => tracing::event!(Level::ERROR, $($rest)+),
            Level::WARN => tracing::event!(Level::WARN, $($rest)+),
            Level::INFO => tracing::event!(Level::INFO, $($rest)+),
            Level::DEBUG => tracing::event!(Level::DEBUG, $($rest)+),
            _ => tracing::event!(Level::TRACE, $($rest)+),
        }
    };
}

/// Logger that emits `tracing` events tagged with a `logger` field.
///
/// # Example
///
/// ```
/// use meh_core::logger::{Logger, TracingLogger};
///
/// let root = TracingLogger::new("meh");
/// let child = root.child("db");
/// assert_eq!(child.name(), "meh/db");
/// child.info("connected");
/// ```
#[derive(Debug, Clone)]
pub struct TracingLogger {
    name: Arc<str>,
}

impl TracingLogger {
    /// Create a logger with the given name.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into() }
    }

    /// Name attached to every event.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create a named child logger: `"<parent>/<name>"`.
    pub fn child(&self, name: &str) -> Self {
        Self::new(format!("{}/{}", self.name, name))
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: Level, message: &str) {
        emit!(level, logger = %self.name, "{}", message);
    }

    fn report(&self, level: Level, error: &dyn Encapsulated) {
        let rendered = error.render();
        emit!(
            level,
            logger = %self.name,
            retryable = error.is_retryable(),
            error = %rendered,
            "{}",
            error
        );
    }
}
