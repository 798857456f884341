#![deny(unsafe_code)]
#![warn(missing_docs)]

//! A minimal request handler scaffold.
//!
//! The pieces are wired at a single composition root:
//!
//! 1. [`config::Config::load`] reads layered JSON/YAML configuration
//! 2. [`logging::init_logging`] installs the `tracing` subscriber described by it
//! 3. [`dependencies::bootstrap`] builds the dependency [`Container`](meh_core::Container)
//! 4. [`handlers::hello::handler`] serves a request using only what the container hands out
//!
//! ```rust
//! use meh::dependencies::bootstrap;
//! use meh::handlers::hello;
//!
//! # fn main() -> meh_core::Result<()> {
//! let deps = bootstrap()?;
//! # temp_env::with_var_unset("FAIL", || {
//! assert_eq!(hello::handler(&deps).unwrap(), "yup");
//! # });
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dependencies;
pub mod handlers;
pub mod logging;
pub mod util;
