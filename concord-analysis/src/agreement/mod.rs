//! Inter-rater agreement coefficients.
//!
//! Every coefficient implements [`AgreementMeasure`]: one call,
//! `compute_irr(data) -> score`, over a coders x subjects table with
//! optional missing cells.

pub mod cohen;
pub mod dataset;
pub mod fleiss;
pub mod krippendorff;
pub mod mace_irr;
pub mod raw;
pub mod scott;

pub use cohen::CohensKappa;
pub use dataset::{CodedReliability, ReliabilityData};
pub use fleiss::FleissKappa;
pub use krippendorff::Krippendorff;
pub use mace_irr::MaceAgreement;
pub use raw::RawAgreement;
pub use scott::ScottsPi;

use concord_core::errors::AgreementError;

use crate::codec::Label;

/// A single inter-rater reliability coefficient.
pub trait AgreementMeasure<T: Label> {
    /// Human-readable coefficient name.
    fn name(&self) -> &'static str;

    /// Score `data`; 1.0 is perfect agreement.
    fn compute_irr(&self, data: &ReliabilityData<T>) -> Result<f64, AgreementError>;
}

/// `(observed - expected) / (1 - expected)`, with perfect chance agreement
/// scoring 1.
pub(crate) fn chance_corrected(observed: f64, expected: f64) -> f64 {
    if expected >= 1.0 {
        1.0
    } else {
        (observed - expected) / (1.0 - expected)
    }
}
