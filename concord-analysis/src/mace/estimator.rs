//! `MaceEstimator`: the public entry point tying codec, restarts, and
//! decoding together.

use std::collections::HashMap;
use std::time::Instant;

use rand::Rng;

use concord_core::config::EstimatorConfig;
use concord_core::errors::EstimatorError;
use concord_core::traits::CancellationToken;

use crate::codec::{encode_table, Label, LabelCodec};
use crate::matrix::Matrix;

use super::decoder;
use super::expectation::{expectation_step, Evidence, ExpectationState};
use super::params::{ParameterState, Priors, KNOWS};
use super::restart::{run_restarts, select_best, TrainingSettings};
use super::types::{FitSummary, TrainingMode};

/// Winning model after `fit`.
#[derive(Debug, Clone)]
struct FittedModel {
    params: ParameterState,
    gold_label_marginals: Matrix,
    log_likelihood: f64,
    summary: FitSummary,
}

/// Multi-Annotator Competence Estimation over an instances x annotators table.
///
/// ```ignore
/// let table = vec![
///     vec![Some("pos"), Some("pos"), None],
///     vec![Some("neg"), Some("pos"), Some("neg")],
/// ];
/// let mut mace = MaceEstimator::new(&table, EstimatorConfig::default())?;
/// mace.fit()?;
/// let labels = mace.decode()?;
/// ```
#[derive(Debug, Clone)]
pub struct MaceEstimator<T: Label> {
    codec: LabelCodec<T>,
    evidence: Evidence,
    config: EstimatorConfig,
    fitted: Option<FittedModel>,
}

impl<T: Label> MaceEstimator<T> {
    /// Encode `table` and validate `config`. `table[d][a]` is annotator
    /// `a`'s label for instance `d`, `None` where it gave none.
    pub fn new(table: &[Vec<Option<T>>], config: EstimatorConfig) -> Result<Self, EstimatorError> {
        config.validate()?;
        let (codec, annotations) = encode_table(table)?;
        let evidence = Evidence {
            annotations,
            num_labels: codec.num_labels(),
            label_priors: None,
            controls: None,
        };
        Ok(Self {
            codec,
            evidence,
            config,
            fitted: None,
        })
    }

    /// Use `priors` (label -> prior probability) instead of a uniform prior.
    /// Labels missing from the map get prior 0; an empty map means uniform.
    pub fn with_label_priors(mut self, priors: &HashMap<T, f64>) -> Result<Self, EstimatorError> {
        if priors.is_empty() {
            self.evidence.label_priors = None;
            self.fitted = None;
            return Ok(self);
        }
        let mut dense = vec![0.0; self.codec.num_labels()];
        for (label, &p) in priors {
            if !(p.is_finite() && p >= 0.0) {
                return Err(EstimatorError::InvalidPrior(format!(
                    "prior for {label:?} must be a finite non-negative number, got {p}"
                )));
            }
            dense[self.codec.encode_known(label, "label priors")? as usize] = p;
        }
        if dense.iter().all(|&p| p == 0.0) {
            return Err(EstimatorError::InvalidPrior(
                "at least one label needs a positive prior".to_string(),
            ));
        }
        self.evidence.label_priors = Some(dense);
        self.fitted = None;
        Ok(self)
    }

    /// Known gold labels aligned with the instances. `None` entries leave an
    /// instance unsupervised; an empty slice means no controls at all.
    pub fn with_controls(mut self, controls: &[Option<T>]) -> Result<Self, EstimatorError> {
        if controls.is_empty() {
            self.evidence.controls = None;
            self.fitted = None;
            return Ok(self);
        }
        let expected = self.evidence.annotations.num_instances();
        if controls.len() != expected {
            return Err(EstimatorError::LengthMismatch {
                what: "controls",
                expected,
                found: controls.len(),
            });
        }
        let coded = controls
            .iter()
            .map(|c| {
                c.as_ref()
                    .map(|label| self.codec.encode_known(label, "controls").map(|code| code as usize))
                    .transpose()
            })
            .collect::<Result<Vec<_>, _>>()?;
        let supervised = coded.iter().any(Option::is_some);
        self.evidence.controls = supervised.then_some(coded);
        self.fitted = None;
        Ok(self)
    }

    /// Run all restarts and keep the best-likelihood model.
    pub fn fit(&mut self) -> Result<FitSummary, EstimatorError> {
        self.fit_with_cancellation(&CancellationToken::new())
    }

    /// Like `fit`, checking `cancel` between iterations.
    pub fn fit_with_cancellation(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<FitSummary, EstimatorError> {
        let start = Instant::now();
        let num_annotators = self.evidence.annotations.num_annotators();
        let num_labels = self.codec.num_labels();

        let mode = TrainingMode::from_use_em(self.config.effective_use_em());
        let iterations = self.config.effective_iterations();
        let restarts = self.config.effective_restarts();
        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        let settings = TrainingSettings {
            mode,
            iterations,
            smoothing: self.config.effective_smoothing(num_labels),
            priors: Priors::new(
                num_annotators,
                num_labels,
                self.config.effective_alpha(),
                self.config.effective_beta(),
            ),
        };

        tracing::info!(
            %mode,
            iterations,
            restarts,
            seed,
            instances = self.evidence.annotations.num_instances(),
            annotators = num_annotators,
            labels = num_labels,
            controls = self.evidence.controls.is_some(),
            "fitting competence model"
        );

        let mut outcomes = run_restarts(
            &self.evidence,
            &settings,
            restarts,
            seed,
            self.config.effective_parallel_restarts(),
            cancel,
        )?;
        let restart_log_likelihoods: Vec<f64> =
            outcomes.iter().map(|o| o.log_likelihood).collect();

        let best_restart = select_best(&outcomes);
        let winner = outcomes.swap_remove(best_restart.unwrap_or(0));
        if best_restart.is_none() {
            tracing::warn!("every restart degenerated; no usable model");
        }

        // Re-run the E-step so the marginals reflect the winning parameters.
        let mut state = ExpectationState::for_evidence(&self.evidence);
        expectation_step(&self.evidence, &winner.params, &mut state);

        let best_log_likelihood = match best_restart {
            Some(_) => winner.log_likelihood,
            None => f64::NEG_INFINITY,
        };
        let summary = FitSummary {
            mode,
            iterations,
            restarts,
            seed,
            best_restart,
            best_log_likelihood,
            restart_log_likelihoods,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };
        tracing::info!(
            best_restart = ?summary.best_restart,
            log_likelihood = summary.best_log_likelihood,
            fit_time_ms = summary.elapsed_ms,
            "training completed"
        );

        self.fitted = Some(FittedModel {
            params: winner.params,
            gold_label_marginals: state.gold_label_marginals,
            log_likelihood: best_log_likelihood,
            summary: summary.clone(),
        });
        Ok(summary)
    }

    fn fitted(&self) -> Result<&FittedModel, EstimatorError> {
        self.fitted.as_ref().ok_or(EstimatorError::NotFitted)
    }

    /// Most likely label per instance, `None` where the decoder abstains.
    pub fn decode(&self) -> Result<Vec<Option<T>>, EstimatorError> {
        let fitted = self.fitted()?;
        let codes = decoder::decode_codes(
            &fitted.gold_label_marginals,
            &self.evidence.annotations,
            self.config.effective_threshold(),
        );
        let labels: Vec<Option<T>> = codes
            .into_iter()
            .map(|code| code.and_then(|c| self.codec.decode(c as u32)).cloned())
            .collect();
        tracing::debug!(
            decoded_instances = labels.iter().filter(|l| l.is_some()).count(),
            "decoded consensus labels"
        );
        Ok(labels)
    }

    /// Full posterior per instance, most probable label first. Empty for
    /// instances nobody annotated and for instances whose marginals vanished.
    pub fn decode_distribution(&self) -> Result<Vec<Vec<(T, f64)>>, EstimatorError> {
        let fitted = self.fitted()?;
        let annotations = &self.evidence.annotations;
        Ok((0..annotations.num_instances())
            .map(|d| {
                if annotations.is_unannotated(d) {
                    return Vec::new();
                }
                decoder::posterior_distribution(fitted.gold_label_marginals.row(d))
                    .into_iter()
                    .filter_map(|(code, p)| self.codec.decode(code as u32).map(|l| (l.clone(), p)))
                    .collect()
            })
            .collect())
    }

    /// Posterior entropy per instance (`-inf` for unannotated instances).
    pub fn label_entropies(&self) -> Result<Vec<f64>, EstimatorError> {
        let fitted = self.fitted()?;
        Ok(decoder::label_entropies(
            &fitted.gold_label_marginals,
            &self.evidence.annotations,
        ))
    }

    /// The entropy cutoff the configured threshold resolves to.
    pub fn entropy_cutoff(&self) -> Result<Option<f64>, EstimatorError> {
        let entropies = self.label_entropies()?;
        Ok(decoder::entropy_cutoff(
            &entropies,
            self.config.effective_threshold(),
        ))
    }

    /// Decode and score against `gold`; abstentions count as misses.
    pub fn accuracy(&self, gold: &[T]) -> Result<f64, EstimatorError> {
        let decoded = self.decode()?;
        if gold.len() != decoded.len() {
            return Err(EstimatorError::LengthMismatch {
                what: "gold labels",
                expected: decoded.len(),
                found: gold.len(),
            });
        }
        Ok(decoder::accuracy(&decoded, gold))
    }

    /// annotators x 2 competence matrix, rows `[P(knows), P(guesses)]`.
    pub fn competence(&self) -> Result<&Matrix, EstimatorError> {
        Ok(&self.fitted()?.params.competence)
    }

    /// annotators x labels guessing distribution (columns in codec order).
    pub fn label_preference(&self) -> Result<&Matrix, EstimatorError> {
        Ok(&self.fitted()?.params.label_preference)
    }

    /// instances x labels unnormalized posteriors of the winning model.
    pub fn gold_label_marginals(&self) -> Result<&Matrix, EstimatorError> {
        Ok(&self.fitted()?.gold_label_marginals)
    }

    /// Log marginal likelihood of the winning model; `-inf` means no usable model.
    pub fn log_likelihood(&self) -> Result<f64, EstimatorError> {
        Ok(self.fitted()?.log_likelihood)
    }

    /// Mean probability of knowing the true label, over all annotators.
    pub fn mean_competence(&self) -> Result<f64, EstimatorError> {
        let competence = self.competence()?;
        let knows = competence.column(KNOWS);
        Ok(knows.iter().sum::<f64>() / knows.len().max(1) as f64)
    }

    pub fn summary(&self) -> Result<&FitSummary, EstimatorError> {
        Ok(&self.fitted()?.summary)
    }

    pub fn codec(&self) -> &LabelCodec<T> {
        &self.codec
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    pub fn num_instances(&self) -> usize {
        self.evidence.annotations.num_instances()
    }

    pub fn num_annotators(&self) -> usize {
        self.evidence.annotations.num_annotators()
    }
}
