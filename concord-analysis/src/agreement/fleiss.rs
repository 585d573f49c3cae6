//! Fleiss' kappa for any number of coders.

use concord_core::errors::AgreementError;

use super::{chance_corrected, AgreementMeasure, ReliabilityData};
use crate::codec::Label;

const NAME: &str = "fleiss_kappa";

/// Subjects may carry different numbers of ratings; those with fewer than
/// two are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct FleissKappa;

impl<T: Label> AgreementMeasure<T> for FleissKappa {
    fn name(&self) -> &'static str {
        NAME
    }

    fn compute_irr(&self, data: &ReliabilityData<T>) -> Result<f64, AgreementError> {
        let insufficient = AgreementError::InsufficientData { measure: NAME };
        let coded = data.encode().ok_or(insufficient.clone())?;

        let mut category_totals = vec![0.0; coded.num_labels];
        let mut subject_agreement = 0.0;
        let mut subjects = 0usize;
        let mut counts = vec![0usize; coded.num_labels];
        for subject in 0..coded.subjects {
            counts.iter_mut().for_each(|c| *c = 0);
            let mut ratings = 0usize;
            for code in coded.subject_values(subject) {
                counts[code] += 1;
                ratings += 1;
            }
            if ratings < 2 {
                continue;
            }
            let squares: usize = counts.iter().map(|c| c * c).sum();
            subject_agreement += (squares - ratings) as f64 / (ratings * (ratings - 1)) as f64;
            for (total, &c) in category_totals.iter_mut().zip(&counts) {
                *total += c as f64;
            }
            subjects += 1;
        }
        if subjects == 0 {
            return Err(insufficient);
        }

        let rated: f64 = category_totals.iter().sum();
        let observed = subject_agreement / subjects as f64;
        let expected: f64 = category_totals.iter().map(|t| (t / rated).powi(2)).sum();
        let kappa = chance_corrected(observed, expected);
        tracing::debug!(measure = NAME, subjects, score = kappa, "computed agreement");
        Ok(kappa)
    }
}
