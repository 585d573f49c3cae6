//! Raw (chance-uncorrected) pairwise agreement.

use concord_core::errors::AgreementError;

use super::{AgreementMeasure, ReliabilityData};
use crate::codec::Label;

const NAME: &str = "raw_agreement";

#[derive(Debug, Clone, Copy, Default)]
pub struct RawAgreement;

impl<T: Label> AgreementMeasure<T> for RawAgreement {
    fn name(&self) -> &'static str {
        NAME
    }

    fn compute_irr(&self, data: &ReliabilityData<T>) -> Result<f64, AgreementError> {
        let insufficient = AgreementError::InsufficientData { measure: NAME };
        let coded = data.encode().ok_or(insufficient.clone())?;
        let score = coded.mean_pairwise_agreement().ok_or(insufficient)?;
        tracing::debug!(measure = NAME, score, "computed agreement");
        Ok(score)
    }
}
