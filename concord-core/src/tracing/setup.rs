//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;
use crate::constants::{DEFAULT_LOG_FILTER, LOG_ENV_VAR, VERSION};

static INIT: Once = Once::new();

/// Initialize tracing with the compiled default filter.
///
/// Reads `CONCORD_LOG` for per-module log levels, e.g.
/// `CONCORD_LOG=concord_analysis::mace=debug`.
pub fn init_tracing() {
    init_tracing_with(&LoggingConfig::default());
}

/// Pick the first directive string that parses: `env_directives`, then
/// `config.filter`, then the compiled default.
pub fn resolve_filter(env_directives: Option<&str>, config: &LoggingConfig) -> EnvFilter {
    env_directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .or_else(|| EnvFilter::try_new(config.effective_filter()).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Initialize tracing, falling back to `config.filter` when `CONCORD_LOG`
/// is unset or invalid.
///
/// Idempotent: only the first call installs a subscriber. A subscriber
/// installed elsewhere (e.g. by a test harness) is left in place.
pub fn init_tracing_with(config: &LoggingConfig) {
    INIT.call_once(|| {
        let env_directives = std::env::var(LOG_ENV_VAR).ok();
        let filter = resolve_filter(env_directives.as_deref(), config);

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
        tracing::debug!(version = VERSION, "tracing initialized");
    });
}
