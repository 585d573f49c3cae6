//! Logging configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_LOG_FILTER;

/// Configuration for the tracing subscriber.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Fallback `EnvFilter` directive used when `CONCORD_LOG` is unset.
    /// Default: "concord=info".
    pub filter: Option<String>,
}

impl LoggingConfig {
    /// Returns the effective fallback filter.
    pub fn effective_filter(&self) -> &str {
        self.filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}
