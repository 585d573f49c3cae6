//! Krippendorff's alpha at the nominal level of measurement.

use concord_core::errors::AgreementError;

use super::{AgreementMeasure, CodedReliability, ReliabilityData};
use crate::codec::Label;
use crate::matrix::Matrix;

const NAME: &str = "krippendorff_alpha";

/// `alpha = 1 - D_o / D_e` over the value coincidence matrix.
///
/// Missing values are allowed; subjects with fewer than two values are not
/// pairable and drop out.
#[derive(Debug, Clone, Copy, Default)]
pub struct Krippendorff;

impl Krippendorff {
    /// label x label coincidences; each pairable subject contributes
    /// `1 / (m_u - 1)` per ordered pair of its `m_u` values.
    fn coincidences(coded: &CodedReliability) -> Matrix {
        let mut matrix = Matrix::zeros(coded.num_labels, coded.num_labels);
        for subject in 0..coded.subjects {
            let values: Vec<usize> = coded.subject_values(subject).collect();
            if values.len() < 2 {
                continue;
            }
            let weight = 1.0 / (values.len() - 1) as f64;
            for (i, &c) in values.iter().enumerate() {
                for (j, &k) in values.iter().enumerate() {
                    if i != j {
                        matrix.add_at(c, k, weight);
                    }
                }
            }
        }
        matrix
    }
}

impl<T: Label> AgreementMeasure<T> for Krippendorff {
    fn name(&self) -> &'static str {
        NAME
    }

    fn compute_irr(&self, data: &ReliabilityData<T>) -> Result<f64, AgreementError> {
        let insufficient = AgreementError::InsufficientData { measure: NAME };
        let coded = data.encode().ok_or(insufficient.clone())?;
        let coincidences = Self::coincidences(&coded);

        let marginals: Vec<f64> = coincidences.iter_rows().map(|r| r.iter().sum()).collect();
        let n: f64 = marginals.iter().sum();
        if n <= 1.0 {
            return Err(insufficient);
        }

        let mut observed = 0.0;
        let mut expected = 0.0;
        for c in 0..coded.num_labels {
            for k in 0..coded.num_labels {
                if c != k {
                    observed += coincidences.get(c, k);
                    expected += marginals[c] * marginals[k];
                }
            }
        }
        // Only one value ever used.
        if expected == 0.0 {
            return Ok(1.0);
        }

        let d_o = observed / n;
        let d_e = expected / (n * (n - 1.0));
        let alpha = 1.0 - d_o / d_e;
        tracing::debug!(measure = NAME, pairable = n, score = alpha, "computed agreement");
        Ok(alpha)
    }
}
