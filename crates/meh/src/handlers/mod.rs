//! Request handlers.
//!
//! Handlers take the dependency container by reference and fetch what they
//! need from it; they never construct collaborators themselves.

pub mod hello;
