//! Configuration system for Concord.
//! TOML-based, layered resolution: overrides > env > project > user > defaults.

pub mod concord_config;
pub mod estimator_config;
pub mod logging_config;

pub use concord_config::{CliOverrides, ConcordConfig};
pub use estimator_config::EstimatorConfig;
pub use logging_config::LoggingConfig;
