//! Agreement as mean annotator competence under the MACE model.

use concord_core::config::EstimatorConfig;
use concord_core::errors::AgreementError;

use super::{AgreementMeasure, ReliabilityData};
use crate::codec::Label;
use crate::mace::MaceEstimator;

const NAME: &str = "mace_competence";

/// Fits a [`MaceEstimator`] with subjects as instances and coders as
/// annotators, then reports the mean probability that a coder knows the label.
#[derive(Debug, Clone, Default)]
pub struct MaceAgreement {
    config: EstimatorConfig,
}

impl MaceAgreement {
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }
}

impl<T: Label> AgreementMeasure<T> for MaceAgreement {
    fn name(&self) -> &'static str {
        NAME
    }

    fn compute_irr(&self, data: &ReliabilityData<T>) -> Result<f64, AgreementError> {
        if data.coders() == 0 || data.subjects() == 0 {
            return Err(AgreementError::InsufficientData { measure: NAME });
        }
        let mut estimator = MaceEstimator::new(&data.to_instance_rows(), self.config.clone())?;
        estimator.fit()?;
        let score = estimator.mean_competence()?;
        tracing::debug!(measure = NAME, score, "computed agreement");
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concord_core::errors::EstimatorError;

    fn seeded() -> MaceAgreement {
        MaceAgreement::new(EstimatorConfig {
            seed: Some(7),
            restarts: Some(3),
            parallel_restarts: Some(false),
            ..Default::default()
        })
    }

    #[test]
    fn test_score_is_a_probability() {
        let coder = vec![0, 2, 0, 1, 0, 1];
        let data = ReliabilityData::from_complete_columns(vec![coder.clone(), coder]).unwrap();
        let score = seeded().compute_irr(&data).unwrap();
        assert!(score > 0.0 && score <= 1.0, "score = {score}");
    }

    #[test]
    fn test_all_missing_surfaces_estimator_error() {
        let data: ReliabilityData<u8> =
            ReliabilityData::from_columns(vec![vec![None, None], vec![None, None]]).unwrap();
        let err = seeded().compute_irr(&data).unwrap_err();
        assert_eq!(err, AgreementError::Estimator(EstimatorError::EmptyVocabulary));
    }

    #[test]
    fn test_empty_table_insufficient() {
        let data: ReliabilityData<u8> = ReliabilityData::from_columns(Vec::new()).unwrap();
        assert!(matches!(
            seeded().compute_irr(&data),
            Err(AgreementError::InsufficientData { .. })
        ));
    }
}
