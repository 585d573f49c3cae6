//! Cohen's kappa for exactly two coders.

use concord_core::errors::AgreementError;

use super::{chance_corrected, AgreementMeasure, ReliabilityData};
use crate::codec::Label;

const NAME: &str = "cohens_kappa";

#[derive(Debug, Clone, Copy, Default)]
pub struct CohensKappa;

impl<T: Label> AgreementMeasure<T> for CohensKappa {
    fn name(&self) -> &'static str {
        NAME
    }

    /// Subjects either coder skipped are left out of both terms.
    fn compute_irr(&self, data: &ReliabilityData<T>) -> Result<f64, AgreementError> {
        if data.coders() > 2 {
            return Err(AgreementError::TooManyCoders {
                measure: NAME,
                max: 2,
                found: data.coders(),
            });
        }
        let insufficient = AgreementError::InsufficientData { measure: NAME };
        if data.coders() < 2 {
            return Err(insufficient);
        }
        let coded = data.encode().ok_or(insufficient.clone())?;

        let mut first = vec![0usize; coded.num_labels];
        let mut second = vec![0usize; coded.num_labels];
        let mut agree = 0usize;
        let mut n = 0usize;
        for (a, b) in coded.coders[0].iter().zip(&coded.coders[1]) {
            if let (Some(a), Some(b)) = (*a, *b) {
                first[a] += 1;
                second[b] += 1;
                agree += usize::from(a == b);
                n += 1;
            }
        }
        if n == 0 {
            return Err(insufficient);
        }

        let total = n as f64;
        let observed = agree as f64 / total;
        let expected: f64 = first
            .iter()
            .zip(&second)
            .map(|(&x, &y)| (x as f64 / total) * (y as f64 / total))
            .sum();
        let kappa = chance_corrected(observed, expected);
        tracing::debug!(measure = NAME, subjects = n, score = kappa, "computed agreement");
        Ok(kappa)
    }
}
