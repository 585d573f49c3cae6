//! Restart controller: independent random restarts, best-likelihood selection.

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;

use concord_core::errors::EstimatorError;
use concord_core::traits::{Cancellable, CancellationToken};

use super::expectation::{expectation_step, Evidence, ExpectationState};
use super::maximization::{maximize_em, maximize_variational};
use super::params::{ParameterState, Priors};
use super::types::TrainingMode;

/// Per-fit training settings shared by all restarts.
#[derive(Debug, Clone)]
pub struct TrainingSettings {
    pub mode: TrainingMode,
    pub iterations: u32,
    pub smoothing: f64,
    pub priors: Priors,
}

/// Final state of one restart.
#[derive(Debug, Clone)]
pub struct RestartOutcome {
    pub restart: usize,
    pub params: ParameterState,
    pub log_likelihood: f64,
}

/// Run one restart: fresh parameters from `seed`, an initial E-step, then
/// `iterations` rounds of {M-step, E-step}.
pub fn run_restart(
    evidence: &Evidence,
    settings: &TrainingSettings,
    restart: usize,
    seed: u64,
    cancel: &CancellationToken,
) -> Result<RestartOutcome, EstimatorError> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut params = ParameterState::random(
        evidence.annotations.num_annotators(),
        evidence.num_labels,
        settings.smoothing,
        &mut rng,
    );
    let mut state = ExpectationState::for_evidence(evidence);

    expectation_step(evidence, &params, &mut state);
    tracing::trace!(restart, initial = state.log_likelihood, "initial log marginal likelihood");

    for _ in 0..settings.iterations {
        if cancel.is_cancelled() {
            return Err(EstimatorError::Cancelled);
        }
        match settings.mode {
            TrainingMode::Em => maximize_em(&mut params, &state.counts, settings.smoothing),
            TrainingMode::VariationalBayes => {
                maximize_variational(&mut params, &state.counts, &settings.priors)
            }
        }
        expectation_step(evidence, &params, &mut state);
    }

    tracing::debug!(restart, log_likelihood = state.log_likelihood, "restart finished");
    Ok(RestartOutcome {
        restart,
        params,
        log_likelihood: state.log_likelihood,
    })
}

/// Run `restarts` restarts, optionally on the rayon pool. Results come back
/// in restart order either way.
pub fn run_restarts(
    evidence: &Evidence,
    settings: &TrainingSettings,
    restarts: u32,
    base_seed: u64,
    parallel: bool,
    cancel: &CancellationToken,
) -> Result<Vec<RestartOutcome>, EstimatorError> {
    let run = |restart: usize| {
        run_restart(
            evidence,
            settings,
            restart,
            base_seed.wrapping_add(restart as u64),
            cancel,
        )
    };
    let count = restarts as usize;
    if parallel {
        (0..count).into_par_iter().map(run).collect()
    } else {
        (0..count).map(run).collect()
    }
}

/// Index of the winning outcome: strictly greater likelihood than everything
/// before it, so ties keep the earlier restart. `None` if nothing beats `-inf`.
pub fn select_best(outcomes: &[RestartOutcome]) -> Option<usize> {
    let mut best = None;
    let mut best_log_likelihood = f64::NEG_INFINITY;
    for (i, outcome) in outcomes.iter().enumerate() {
        if outcome.log_likelihood > best_log_likelihood {
            best_log_likelihood = outcome.log_likelihood;
            best = Some(i);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Matrix;

    fn outcome(restart: usize, log_likelihood: f64) -> RestartOutcome {
        RestartOutcome {
            restart,
            params: ParameterState {
                competence: Matrix::zeros(1, 2),
                label_preference: Matrix::zeros(1, 1),
            },
            log_likelihood,
        }
    }

    #[test]
    fn test_ties_keep_earlier_restart() {
        let outcomes = vec![outcome(0, -5.0), outcome(1, -3.0), outcome(2, -3.0)];
        assert_eq!(select_best(&outcomes), Some(1));
    }

    #[test]
    fn test_degenerate_restarts_never_win() {
        let outcomes = vec![
            outcome(0, f64::NEG_INFINITY),
            outcome(1, f64::NAN),
            outcome(2, -10.0),
        ];
        assert_eq!(select_best(&outcomes), Some(2));

        let all_bad = vec![outcome(0, f64::NEG_INFINITY), outcome(1, f64::NAN)];
        assert_eq!(select_best(&all_bad), None);
    }
}
