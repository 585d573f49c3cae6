//! Expectation step: per-instance label marginals, fractional counts,
//! and the log marginal likelihood.

use crate::codec::AnnotationMatrix;
use crate::matrix::Matrix;

use super::params::{Accumulators, ParameterState, GUESSES, KNOWS};

/// Everything the E-step reads that does not change during a fit.
#[derive(Debug, Clone)]
pub struct Evidence {
    pub annotations: AnnotationMatrix,
    pub num_labels: usize,
    /// Prior probability per label code; `None` means uniform.
    pub label_priors: Option<Vec<f64>>,
    /// Known gold code per instance; `None` means unsupervised everywhere.
    pub controls: Option<Vec<Option<usize>>>,
}

impl Evidence {
    #[inline]
    fn label_prior(&self, label: usize) -> f64 {
        match &self.label_priors {
            Some(priors) => priors[label],
            None => 1.0 / self.num_labels as f64,
        }
    }

    #[inline]
    fn control(&self, instance: usize) -> Option<usize> {
        self.controls.as_ref().and_then(|c| c[instance])
    }
}

/// Output buffers of the E-step, reused across iterations.
#[derive(Debug, Clone)]
pub struct ExpectationState {
    /// instances x labels, unnormalized posterior of each gold label.
    pub gold_label_marginals: Matrix,
    pub counts: Accumulators,
    pub log_likelihood: f64,
}

impl ExpectationState {
    pub fn new(num_instances: usize, num_annotators: usize, num_labels: usize) -> Self {
        Self {
            gold_label_marginals: Matrix::zeros(num_instances, num_labels),
            counts: Accumulators::new(num_annotators, num_labels),
            log_likelihood: 0.0,
        }
    }

    pub fn for_evidence(evidence: &Evidence) -> Self {
        Self::new(
            evidence.annotations.num_instances(),
            evidence.annotations.num_annotators(),
            evidence.num_labels,
        )
    }

    fn reset(&mut self) {
        self.gold_label_marginals.clear();
        self.counts.clear();
        self.log_likelihood = 0.0;
    }
}

/// Run one E-step under `params`, overwriting `state`.
///
/// Instances nobody annotated are skipped entirely. An instance whose
/// marginals all underflow adds `ln(0) = -inf` to the likelihood and no counts.
pub fn expectation_step(evidence: &Evidence, params: &ParameterState, state: &mut ExpectationState) {
    state.reset();

    let annotations = &evidence.annotations;
    let competence = &params.competence;
    let preference = &params.label_preference;

    for d in 0..annotations.num_instances() {
        let active = annotations.active_annotators(d);
        if active.is_empty() {
            continue;
        }
        let control = evidence.control(d);

        // 1. label marginals
        let mut instance_marginal = 0.0;
        for l in 0..evidence.num_labels {
            if control.is_some_and(|c| c != l) {
                continue;
            }
            let mut marginal = evidence.label_prior(l);
            for &a in active {
                let observed = observed_label(annotations, d, a);
                let guessed = competence.get(a, GUESSES) * preference.get(a, observed);
                marginal *= if l == observed {
                    guessed + competence.get(a, KNOWS)
                } else {
                    guessed
                };
            }
            state.gold_label_marginals.set(d, l, marginal);
            instance_marginal += marginal;
        }

        state.log_likelihood += instance_marginal.ln();
        if instance_marginal <= 0.0 || !instance_marginal.is_finite() {
            continue;
        }

        // 2. fractional counts
        let marginals = state.gold_label_marginals.row(d);
        for &a in active {
            let observed = observed_label(annotations, d, a);
            let guessed = competence.get(a, GUESSES) * preference.get(a, observed);
            let knows = competence.get(a, KNOWS);

            let guess_mass = match control {
                Some(gold) if gold != observed => {
                    // Disagreeing with a known gold label can only be a guess.
                    state.counts.label_preference.add_at(a, observed, 1.0);
                    state.counts.competence.add_at(a, GUESSES, 1.0);
                    continue;
                }
                Some(gold) => marginals[gold] / (guessed + knows),
                None => marginals
                    .iter()
                    .enumerate()
                    .map(|(l, &m)| {
                        let denom = if l == observed { guessed + knows } else { guessed };
                        m / denom
                    })
                    .sum::<f64>(),
            } * guessed;

            let guess_share = guess_mass / instance_marginal;
            let knows_share = marginals[observed] * knows / (guessed + knows) / instance_marginal;

            state.counts.label_preference.add_at(a, observed, guess_share);
            state.counts.competence.add_at(a, GUESSES, guess_share);
            state.counts.competence.add_at(a, KNOWS, knows_share);
        }
    }
}

#[inline]
fn observed_label(annotations: &AnnotationMatrix, instance: usize, annotator: usize) -> usize {
    annotations.code(instance, annotator) as usize
}
