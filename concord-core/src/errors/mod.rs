//! Error handling for Concord.
//! One error enum per subsystem, `thiserror` only.

pub mod agreement_error;
pub mod config_error;
pub mod error_code;
pub mod estimator_error;

pub use agreement_error::AgreementError;
pub use config_error::ConfigError;
pub use error_code::ConcordErrorCode;
pub use estimator_error::EstimatorError;
