//! Top-level Concord configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{EstimatorConfig, LoggingConfig};
use crate::constants::PROJECT_CONFIG_FILE;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `apply_cli_overrides`)
/// 2. Environment variables (`CONCORD_*`)
/// 3. Project config (`concord.toml` in project root)
/// 4. User config (`~/.concord/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ConcordConfig {
    pub estimator: EstimatorConfig,
    pub logging: LoggingConfig,
}

/// Override arguments that take precedence over every other layer.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub restarts: Option<u32>,
    pub iterations: Option<u32>,
    pub use_em: Option<bool>,
    pub threshold: Option<f64>,
    pub seed: Option<u64>,
}

impl ConcordConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(err @ ConfigError::ParseError { .. }) => return Err(err),
                    Err(err) => {
                        tracing::warn!(error = %err, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config)?;

        // Layer 1 (highest priority): explicit overrides
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.estimator.validate()
    }

    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".concord").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are ignored.
    fn merge_toml_file(config: &mut ConcordConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: ConcordConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; only `Some` values in `other` win.
    fn merge(base: &mut ConcordConfig, other: &ConcordConfig) {
        let (b, o) = (&mut base.estimator, &other.estimator);
        if o.alpha.is_some() {
            b.alpha = o.alpha;
        }
        if o.beta.is_some() {
            b.beta = o.beta;
        }
        if o.use_em.is_some() {
            b.use_em = o.use_em;
        }
        if o.iterations.is_some() {
            b.iterations = o.iterations;
        }
        if o.restarts.is_some() {
            b.restarts = o.restarts;
        }
        if o.threshold.is_some() {
            b.threshold = o.threshold;
        }
        if o.smoothing.is_some() {
            b.smoothing = o.smoothing;
        }
        if o.seed.is_some() {
            b.seed = o.seed;
        }
        if o.parallel_restarts.is_some() {
            b.parallel_restarts = o.parallel_restarts;
        }

        if other.logging.filter.is_some() {
            base.logging.filter = other.logging.filter.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `CONCORD_RESTARTS`, `CONCORD_ALPHA`, etc.
    fn apply_env_overrides(config: &mut ConcordConfig) -> Result<(), ConfigError> {
        let est = &mut config.estimator;
        if let Some(v) = env_parse::<f64>("CONCORD_ALPHA")? {
            est.alpha = Some(v);
        }
        if let Some(v) = env_parse::<f64>("CONCORD_BETA")? {
            est.beta = Some(v);
        }
        if let Some(v) = env_parse::<bool>("CONCORD_USE_EM")? {
            est.use_em = Some(v);
        }
        if let Some(v) = env_parse::<u32>("CONCORD_ITERATIONS")? {
            est.iterations = Some(v);
        }
        if let Some(v) = env_parse::<u32>("CONCORD_RESTARTS")? {
            est.restarts = Some(v);
        }
        if let Some(v) = env_parse::<f64>("CONCORD_THRESHOLD")? {
            est.threshold = Some(v);
        }
        if let Some(v) = env_parse::<f64>("CONCORD_SMOOTHING")? {
            est.smoothing = Some(v);
        }
        if let Some(v) = env_parse::<u64>("CONCORD_SEED")? {
            est.seed = Some(v);
        }
        if let Some(v) = env_parse::<bool>("CONCORD_PARALLEL_RESTARTS")? {
            est.parallel_restarts = Some(v);
        }
        Ok(())
    }

    fn apply_cli_overrides(config: &mut ConcordConfig, cli: &CliOverrides) {
        let est = &mut config.estimator;
        if let Some(v) = cli.restarts {
            est.restarts = Some(v);
        }
        if let Some(v) = cli.iterations {
            est.iterations = Some(v);
        }
        if let Some(v) = cli.use_em {
            est.use_em = Some(v);
        }
        if let Some(v) = cli.threshold {
            est.threshold = Some(v);
        }
        if let Some(v) = cli.seed {
            est.seed = Some(v);
        }
    }
}

/// Parse an environment variable, treating unset as `None`.
fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(val) => val
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                field: key.to_string(),
                message: format!("cannot parse {val:?}"),
            }),
        Err(_) => Ok(None),
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
