//! Parameter state: competence, label preference, priors, and the
//! fractional-count accumulators consumed by the M-step.

use rand::Rng;
use serde::{Deserialize, Serialize};

use concord_core::constants::LABEL_PREFERENCE_PRIOR;

use crate::matrix::Matrix;

/// Competence column: probability the annotator knows the true label.
pub const KNOWS: usize = 0;
/// Competence column: probability the annotator guesses from its preference.
pub const GUESSES: usize = 1;

/// Model parameters for one restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterState {
    /// annotators x 2, rows `[P(knows), P(guesses)]`.
    pub competence: Matrix,
    /// annotators x labels, the guessing distribution of each annotator.
    pub label_preference: Matrix,
}

impl ParameterState {
    /// Fresh random parameters: uniform draws plus `smoothing`, row-normalized,
    /// so no probability is ever exactly zero.
    pub fn random<R: Rng>(
        num_annotators: usize,
        num_labels: usize,
        smoothing: f64,
        rng: &mut R,
    ) -> Self {
        let mut competence =
            Matrix::from_fn(num_annotators, 2, |_, _| rng.random::<f64>() + smoothing);
        competence.normalize_rows();

        let mut label_preference = Matrix::from_fn(num_annotators, num_labels, |_, _| {
            rng.random::<f64>() + smoothing
        });
        label_preference.normalize_rows();

        Self {
            competence,
            label_preference,
        }
    }

    pub fn num_annotators(&self) -> usize {
        self.competence.rows()
    }

    pub fn num_labels(&self) -> usize {
        self.label_preference.cols()
    }

    /// Per-annotator probability of knowing the true label.
    pub fn knows_column(&self) -> Vec<f64> {
        self.competence.column(KNOWS)
    }
}

/// Prior pseudo-counts for the variational M-step. Constant for a fit.
#[derive(Debug, Clone, PartialEq)]
pub struct Priors {
    /// annotators x 2; `beta` on the knows column, `alpha` on the guesses column.
    pub competence: Matrix,
    /// annotators x labels, every cell `LABEL_PREFERENCE_PRIOR`.
    pub label_preference: Matrix,
}

impl Priors {
    pub fn new(num_annotators: usize, num_labels: usize, alpha: f64, beta: f64) -> Self {
        let competence = Matrix::from_fn(num_annotators, 2, |_, col| match col {
            KNOWS => beta,
            _ => alpha,
        });
        let label_preference = Matrix::filled(num_annotators, num_labels, LABEL_PREFERENCE_PRIOR);
        Self {
            competence,
            label_preference,
        }
    }
}

/// Fractional counts collected by the E-step.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulators {
    /// annotators x 2, evidence for knowing vs. guessing.
    pub competence: Matrix,
    /// annotators x labels, evidence for each guessed label.
    pub label_preference: Matrix,
}

impl Accumulators {
    pub fn new(num_annotators: usize, num_labels: usize) -> Self {
        Self {
            competence: Matrix::zeros(num_annotators, 2),
            label_preference: Matrix::zeros(num_annotators, num_labels),
        }
    }

    pub fn clear(&mut self) {
        self.competence.clear();
        self.label_preference.clear();
    }
}
