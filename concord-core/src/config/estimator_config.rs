//! Competence estimator configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ALPHA, DEFAULT_BETA, DEFAULT_ITERATIONS, DEFAULT_PARALLEL_RESTARTS,
    DEFAULT_RESTARTS, DEFAULT_SMOOTHING_NUMERATOR, DEFAULT_THRESHOLD, DEFAULT_USE_EM,
};
use crate::errors::ConfigError;

/// Hyperparameters of the MACE estimator.
///
/// Every field is optional so that config layers can be merged; the
/// `effective_*` accessors resolve the compiled defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Alpha of the Beta prior on competence (variational Bayes only). Default: 0.5.
    pub alpha: Option<f64>,
    /// Beta of the Beta prior on competence (variational Bayes only). Default: 0.5.
    pub beta: Option<f64>,
    /// Use plain EM instead of variational Bayes. Default: false.
    pub use_em: Option<bool>,
    /// E/M iterations per restart. Default: 50.
    pub iterations: Option<u32>,
    /// Number of random restarts. Default: 10.
    pub restarts: Option<u32>,
    /// Fraction of instances (ordered by entropy) eligible for decoding. Default: 1.0.
    pub threshold: Option<f64>,
    /// Additive smoothing. Default: 0.01 / number of labels.
    pub smoothing: Option<f64>,
    /// Base seed for restart initialization. Default: drawn at fit time.
    pub seed: Option<u64>,
    /// Run restarts on the rayon pool. Default: true.
    pub parallel_restarts: Option<bool>,
}

impl EstimatorConfig {
    pub fn effective_alpha(&self) -> f64 {
        self.alpha.unwrap_or(DEFAULT_ALPHA)
    }

    pub fn effective_beta(&self) -> f64 {
        self.beta.unwrap_or(DEFAULT_BETA)
    }

    pub fn effective_use_em(&self) -> bool {
        self.use_em.unwrap_or(DEFAULT_USE_EM)
    }

    pub fn effective_iterations(&self) -> u32 {
        self.iterations.unwrap_or(DEFAULT_ITERATIONS)
    }

    pub fn effective_restarts(&self) -> u32 {
        self.restarts.unwrap_or(DEFAULT_RESTARTS)
    }

    pub fn effective_threshold(&self) -> f64 {
        self.threshold.unwrap_or(DEFAULT_THRESHOLD)
    }

    /// Returns the effective smoothing for a vocabulary of `num_labels` labels.
    pub fn effective_smoothing(&self, num_labels: usize) -> f64 {
        self.smoothing
            .unwrap_or(DEFAULT_SMOOTHING_NUMERATOR / num_labels.max(1) as f64)
    }

    pub fn effective_parallel_restarts(&self) -> bool {
        self.parallel_restarts.unwrap_or(DEFAULT_PARALLEL_RESTARTS)
    }

    /// Validate the hyperparameters that are set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("estimator.alpha", self.alpha),
            ("estimator.beta", self.beta),
            ("estimator.smoothing", self.smoothing),
        ] {
            if let Some(v) = value {
                if !(v.is_finite() && v > 0.0) {
                    return Err(ConfigError::ValidationFailed {
                        field: field.to_string(),
                        message: "must be a finite number greater than 0".to_string(),
                    });
                }
            }
        }
        if self.iterations == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "estimator.iterations".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if self.restarts == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "estimator.restarts".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(threshold) = self.threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ConfigError::ValidationFailed {
                    field: "estimator.threshold".to_string(),
                    message: "must be between 0.0 and 1.0".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EstimatorConfig::default();
        assert_eq!(config.effective_alpha(), 0.5);
        assert_eq!(config.effective_beta(), 0.5);
        assert!(!config.effective_use_em());
        assert_eq!(config.effective_iterations(), 50);
        assert_eq!(config.effective_restarts(), 10);
        assert_eq!(config.effective_threshold(), 1.0);
        assert!((config.effective_smoothing(4) - 0.0025).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_smoothing_ignores_label_count() {
        let config = EstimatorConfig {
            smoothing: Some(0.3),
            ..Default::default()
        };
        assert_eq!(config.effective_smoothing(100), 0.3);
    }

    #[test]
    fn test_rejects_non_positive_alpha() {
        let config = EstimatorConfig {
            alpha: Some(0.0),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed { ref field, .. }) if field == "estimator.alpha"
        ));
    }

    #[test]
    fn test_rejects_nan_smoothing() {
        let config = EstimatorConfig {
            smoothing: Some(f64::NAN),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_restarts_and_iterations() {
        let restarts = EstimatorConfig {
            restarts: Some(0),
            ..Default::default()
        };
        assert!(restarts.validate().is_err());

        let iterations = EstimatorConfig {
            iterations: Some(0),
            ..Default::default()
        };
        assert!(iterations.validate().is_err());
    }

    #[test]
    fn test_large_iteration_counts_accepted() {
        let config = EstimatorConfig {
            iterations: Some(2000),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.effective_iterations(), 2000);
    }

    #[test]
    fn test_threshold_bounds() {
        for ok in [0.0, 0.5, 1.0] {
            let config = EstimatorConfig {
                threshold: Some(ok),
                ..Default::default()
            };
            assert!(config.validate().is_ok(), "threshold {ok} should be valid");
        }
        let config = EstimatorConfig {
            threshold: Some(1.5),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
