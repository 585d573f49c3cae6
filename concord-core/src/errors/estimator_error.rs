//! Competence estimator errors.

use super::error_code::{self, ConcordErrorCode};
use super::ConfigError;

/// Errors raised by the label codec and the competence estimator.
///
/// All of these are detected before the first iteration, except
/// `Cancelled`. Numerical degeneracies are never errors: they surface
/// as a `-inf` log-likelihood.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimatorError {
    #[error("Annotation table contains no annotations")]
    EmptyVocabulary,

    #[error("Annotation table is ragged: row {row} has {found} columns, expected {expected}")]
    RaggedTable {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Length mismatch for {what}: expected {expected}, got {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Label {label} in {context} does not occur in the annotations")]
    UnknownLabel { label: String, context: &'static str },

    #[error("Invalid label prior: {0}")]
    InvalidPrior(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Estimator has not been fitted")]
    NotFitted,

    #[error("Estimation cancelled")]
    Cancelled,
}

impl ConcordErrorCode for EstimatorError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyVocabulary => error_code::EMPTY_VOCABULARY,
            Self::RaggedTable { .. }
            | Self::LengthMismatch { .. }
            | Self::UnknownLabel { .. }
            | Self::InvalidPrior(_) => error_code::INVALID_INPUT,
            Self::Config(e) => e.error_code(),
            Self::NotFitted => error_code::NOT_FITTED,
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}
