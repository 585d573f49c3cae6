//! MACE: Multi-Annotator Competence Estimation.
//!
//! Each annotator either knows the true label of an instance or guesses
//! from a personal label preference. EM or variational Bayes over many
//! random restarts recovers per-annotator competence and preference and
//! a posterior over each instance's true label; the decoder turns those
//! posteriors into consensus labels, abstaining on high-entropy items.
//!
//! Flow per fit: `params` (random init) -> `expectation` <-> `maximization`
//! under `restart`, then `decoder` on the winning model's marginals.

pub mod decoder;
pub mod estimator;
pub mod expectation;
pub mod maximization;
pub mod params;
pub mod restart;
pub mod types;

pub use estimator::MaceEstimator;
pub use params::{ParameterState, Priors, GUESSES, KNOWS};
pub use types::{FitSummary, TrainingMode};
