//! Agreement coefficients through the shared `AgreementMeasure` interface.

use concord_analysis::agreement::{
    CohensKappa, FleissKappa, Krippendorff, MaceAgreement, RawAgreement, ScottsPi,
};
use concord_analysis::{AgreementMeasure, ReliabilityData};
use concord_core::config::EstimatorConfig;
use concord_core::errors::{AgreementError, ConcordErrorCode};

fn measures() -> Vec<Box<dyn AgreementMeasure<u8>>> {
    vec![
        Box::new(Krippendorff),
        Box::new(CohensKappa),
        Box::new(FleissKappa),
        Box::new(ScottsPi),
        Box::new(RawAgreement),
    ]
}

fn mace() -> MaceAgreement {
    MaceAgreement::new(EstimatorConfig {
        seed: Some(42),
        restarts: Some(4),
        parallel_restarts: Some(false),
        ..Default::default()
    })
}

fn agreeing() -> ReliabilityData<u8> {
    let coder = vec![0, 2, 0, 1, 0, 1];
    ReliabilityData::from_complete_columns(vec![coder.clone(), coder]).unwrap()
}

fn disagreeing() -> ReliabilityData<u8> {
    ReliabilityData::from_complete_columns(vec![vec![0, 2, 0, 1, 0, 1], vec![0, 1, 0, 1, 0, 2]])
        .unwrap()
}

#[test]
fn test_complete_agreement_scores_one_everywhere() {
    let data = agreeing();
    for measure in measures() {
        assert_eq!(measure.compute_irr(&data).unwrap(), 1.0, "{}", measure.name());
    }
}

#[test]
fn test_disagreement_scores_below_one() {
    let data = disagreeing();
    for measure in measures() {
        let score = measure.compute_irr(&data).unwrap();
        assert!(score < 1.0, "{} = {score}", measure.name());
    }
}

#[test]
fn test_measure_names_are_distinct() {
    let mut names: Vec<&str> = measures().iter().map(|m| m.name()).collect();
    names.push(AgreementMeasure::<u8>::name(&mace()));
    let count = names.len();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), count);
}

#[test]
fn test_mace_score_is_probability() {
    for data in [agreeing(), disagreeing()] {
        let score = mace().compute_irr(&data).unwrap();
        assert!(score > 0.0 && score <= 1.0, "score = {score}");
    }
}

#[test]
fn test_instance_rows_match_columns() {
    let rows: Vec<Vec<Option<u8>>> = vec![
        vec![Some(0), Some(0)],
        vec![Some(2), Some(1)],
        vec![Some(0), Some(0)],
        vec![Some(1), Some(1)],
        vec![Some(0), Some(0)],
        vec![Some(1), Some(2)],
    ];
    let from_rows = ReliabilityData::from_instance_rows(&rows).unwrap();
    assert_eq!(from_rows, disagreeing());
}

#[test]
fn test_missing_values_tolerated_by_multi_coder_measures() {
    let data = ReliabilityData::from_columns(vec![
        vec![Some("a"), Some("b"), None, Some("a")],
        vec![Some("a"), Some("b"), Some("b"), None],
        vec![None, Some("b"), Some("b"), Some("a")],
    ])
    .unwrap();
    assert_eq!(Krippendorff.compute_irr(&data).unwrap(), 1.0);
    assert_eq!(FleissKappa.compute_irr(&data).unwrap(), 1.0);
    assert_eq!(ScottsPi.compute_irr(&data).unwrap(), 1.0);
    assert_eq!(RawAgreement.compute_irr(&data).unwrap(), 1.0);
    assert!(matches!(
        CohensKappa.compute_irr(&data),
        Err(AgreementError::TooManyCoders { max: 2, found: 3, .. })
    ));
}

#[test]
fn test_error_codes() {
    let err = AgreementError::InsufficientData { measure: "raw_agreement" };
    assert_eq!(err.error_code(), "AGREEMENT_ERROR");

    let nested = mace()
        .compute_irr(&ReliabilityData::<u8>::from_columns(vec![vec![None]]).unwrap())
        .unwrap_err();
    assert_eq!(nested.error_code(), "EMPTY_VOCABULARY");
}
