//! Annotation-quality analysis: label codec, MACE competence estimation
//! with consensus decoding, and inter-rater agreement coefficients.

pub mod agreement;
pub mod codec;
pub mod mace;
pub mod matrix;

pub use agreement::{AgreementMeasure, ReliabilityData};
pub use codec::{AnnotationMatrix, Label, LabelCodec, MISSING_CODE};
pub use mace::{FitSummary, MaceEstimator, TrainingMode};
pub use matrix::Matrix;
