//! Core types, errors, config, tracing, cancellation, and constants
//! shared by the Concord crates.

pub mod config;
pub mod constants;
pub mod errors;
pub mod traits;
pub mod tracing;
