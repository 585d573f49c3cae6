//! Agreement-coefficient errors.

use super::error_code::{self, ConcordErrorCode};
use super::EstimatorError;

/// Errors that can occur while computing an inter-rater agreement score.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AgreementError {
    #[error("{measure} supports at most {max} coders, got {found}")]
    TooManyCoders {
        measure: &'static str,
        max: usize,
        found: usize,
    },

    #[error("Not enough paired annotations to compute {measure}")]
    InsufficientData { measure: &'static str },

    #[error("Reliability data is ragged: coder {coder} has {found} subjects, expected {expected}")]
    RaggedData {
        coder: usize,
        expected: usize,
        found: usize,
    },

    #[error("Estimator error: {0}")]
    Estimator(#[from] EstimatorError),
}

impl ConcordErrorCode for AgreementError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Estimator(e) => e.error_code(),
            _ => error_code::AGREEMENT_ERROR,
        }
    }
}
