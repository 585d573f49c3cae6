//! Scott's pi, generalized to many coders.

use concord_core::errors::AgreementError;

use super::{chance_corrected, AgreementMeasure, ReliabilityData};
use crate::codec::Label;

const NAME: &str = "scotts_pi";

/// Observed agreement is the mean over coder pairs; chance agreement uses
/// label proportions pooled over every rating.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScottsPi;

impl<T: Label> AgreementMeasure<T> for ScottsPi {
    fn name(&self) -> &'static str {
        NAME
    }

    fn compute_irr(&self, data: &ReliabilityData<T>) -> Result<f64, AgreementError> {
        let insufficient = AgreementError::InsufficientData { measure: NAME };
        let coded = data.encode().ok_or(insufficient.clone())?;
        let observed = coded.mean_pairwise_agreement().ok_or(insufficient)?;

        let totals = coded.label_totals();
        let rated = totals.iter().sum::<usize>() as f64;
        let expected: f64 = totals.iter().map(|&t| (t as f64 / rated).powi(2)).sum();
        let pi = chance_corrected(observed, expected);
        tracing::debug!(measure = NAME, score = pi, "computed agreement");
        Ok(pi)
    }
}
