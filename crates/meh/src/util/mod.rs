//! Small helpers used by the handlers.

/// String helpers.
pub mod string;
