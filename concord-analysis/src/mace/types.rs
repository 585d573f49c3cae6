//! Result and mode types for the MACE estimator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which M-step runs each iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingMode {
    /// Add-smoothing maximum likelihood.
    Em,
    /// Digamma posterior-mean update under Beta/Dirichlet priors.
    VariationalBayes,
}

impl TrainingMode {
    pub fn from_use_em(use_em: bool) -> Self {
        if use_em {
            Self::Em
        } else {
            Self::VariationalBayes
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Em => "em",
            Self::VariationalBayes => "variational_bayes",
        }
    }
}

impl fmt::Display for TrainingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a call to `fit` did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitSummary {
    pub mode: TrainingMode,
    pub iterations: u32,
    pub restarts: u32,
    /// Base seed; restart `i` was seeded with `seed + i`.
    pub seed: u64,
    /// Index of the winning restart, `None` when every restart degenerated.
    pub best_restart: Option<usize>,
    /// Log marginal likelihood of the winning model, `-inf` if none is usable.
    pub best_log_likelihood: f64,
    /// Final log marginal likelihood of every restart, in restart order.
    pub restart_log_likelihoods: Vec<f64>,
    pub elapsed_ms: u64,
}

impl FitSummary {
    /// False when every restart ended at `-inf`: the model should not be trusted.
    pub fn is_usable(&self) -> bool {
        self.best_restart.is_some()
    }
}
