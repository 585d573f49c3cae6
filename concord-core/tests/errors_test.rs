//! Tests for the Concord error types.

use std::collections::HashSet;

use concord_core::errors::*;

#[test]
fn test_all_errors_have_error_code() {
    let config = ConfigError::FileNotFound {
        path: "/tmp".into(),
    };
    assert!(!config.error_code().is_empty());

    let estimator = EstimatorError::EmptyVocabulary;
    assert!(!estimator.error_code().is_empty());

    let agreement = AgreementError::InsufficientData {
        measure: "Krippendorff's alpha",
    };
    assert!(!agreement.error_code().is_empty());
}

#[test]
fn test_from_conversions() {
    let config = ConfigError::ValidationFailed {
        field: "estimator.alpha".into(),
        message: "must be > 0".into(),
    };
    let estimator: EstimatorError = config.into();
    assert!(matches!(estimator, EstimatorError::Config(_)));
    assert_eq!(estimator.error_code(), "CONFIG_ERROR");

    let agreement: AgreementError = EstimatorError::NotFitted.into();
    assert!(matches!(agreement, AgreementError::Estimator(EstimatorError::NotFitted)));
    assert_eq!(agreement.error_code(), "NOT_FITTED");
}

#[test]
fn test_tagged_string_format() {
    let err = EstimatorError::LengthMismatch {
        what: "controls",
        expected: 6,
        found: 5,
    };
    assert_eq!(
        err.tagged_string(),
        "[INVALID_INPUT] Length mismatch for controls: expected 6, got 5"
    );
}

#[test]
fn test_estimator_codes_are_distinct_per_category() {
    let codes: HashSet<&str> = [
        EstimatorError::EmptyVocabulary.error_code(),
        EstimatorError::InvalidPrior("x".into()).error_code(),
        EstimatorError::NotFitted.error_code(),
        EstimatorError::Cancelled.error_code(),
    ]
    .into_iter()
    .collect();
    assert_eq!(codes.len(), 4);
}
