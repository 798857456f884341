#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core abstractions for the meh handler scaffold.
//!
//! This crate provides the two pieces the rest of the scaffold leans on:
//!
//! - **Encapsulated errors** via [`EncapsulatedError`] and the [`Encapsulated`] trait
//!   - Single or multiple underlying causes, foreign or encapsulated
//!   - Structured diagnostic details
//!   - Retryability derived from the cause tree, or set explicitly via [`Retry`]
//!   - A stable JSON rendering for log sinks and error trackers
//! - **A typed dependency registry** via [`Container`] and the
//!   [`dependency_schema!`] macro, so collaborators such as the logger are
//!   fetched instead of imported
//! - **A logging capability** via the [`Logger`] trait and its
//!   `tracing`-backed implementation
//!
//! # Examples
//!
//! Using the prelude for convenient imports:
//!
//! ```rust
//! use meh_core::prelude::*;
//!
//! let inner = EncapsulatedError::new("upstream timed out").with_retry(Retry::retryable(true));
//! let outer = EncapsulatedError::new("fetch failed").with_reason(inner);
//!
//! assert!(outer.is_retryable());
//! assert_eq!(
//!     outer.to_string(),
//!     "EncapsulatedError: fetch failed [EncapsulatedError: upstream timed out]"
//! );
//! ```

pub mod error;
pub mod logger;
pub mod registry;
pub mod retry;

pub use error::{
    Cause, DependencyInjectionError, Encapsulated, EncapsulatedError, Reason, Result,
};
pub use logger::{Logger, SharedLogger, TracingLogger};
pub use registry::{Container, DependencyKey};
pub use retry::Retry;

/// Convenient re-exports of commonly used items.
///
/// Import all core abstractions with:
///
/// ```rust
/// use meh_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::dependency_schema;
    pub use crate::error::{
        Cause, DependencyInjectionError, Encapsulated, EncapsulatedError, Reason,
    };
    pub use crate::logger::{Level, Logger, SharedLogger, TracingLogger};
    pub use crate::registry::{Container, DependencyKey};
    pub use crate::retry::Retry;
}
