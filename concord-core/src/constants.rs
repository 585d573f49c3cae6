//! Shared constants for the Concord engine.

/// Concord version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default alpha of the Beta prior on competence (guessing column).
pub const DEFAULT_ALPHA: f64 = 0.5;

/// Default beta of the Beta prior on competence (knowing column).
pub const DEFAULT_BETA: f64 = 0.5;

/// Default training mode: variational Bayes.
pub const DEFAULT_USE_EM: bool = false;

/// Default number of E/M iterations per restart.
pub const DEFAULT_ITERATIONS: u32 = 50;

/// Default number of random restarts.
pub const DEFAULT_RESTARTS: u32 = 10;

/// Default decode threshold (fraction of instances, ordered by entropy, to keep).
pub const DEFAULT_THRESHOLD: f64 = 1.0;

/// Numerator of the default smoothing constant, divided by the number of labels.
pub const DEFAULT_SMOOTHING_NUMERATOR: f64 = 0.01;

/// Prior count added to every label-preference cell in the variational M-step.
pub const LABEL_PREFERENCE_PRIOR: f64 = 10.0;

/// Default restart parallelism.
pub const DEFAULT_PARALLEL_RESTARTS: bool = true;

/// Default tracing filter when `CONCORD_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "concord=info";

/// Environment variable read by `init_tracing`.
pub const LOG_ENV_VAR: &str = "CONCORD_LOG";

/// Project-level config file name.
pub const PROJECT_CONFIG_FILE: &str = "concord.toml";
