//! Property-based tests for the estimator's probabilistic invariants.
//!
//! Uses proptest to fuzz-verify:
//!   - distribution rows sum to 1 after initialization and EM M-steps
//!   - EM log marginal likelihood never decreases within a restart
//!   - decoding yields exactly one entry per instance

use proptest::prelude::*;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use concord_analysis::codec::encode_table;
use concord_analysis::mace::expectation::{expectation_step, Evidence, ExpectationState};
use concord_analysis::mace::maximization::{maximize_em, maximize_variational};
use concord_analysis::mace::{ParameterState, Priors};
use concord_analysis::{MaceEstimator, Matrix};
use concord_core::config::EstimatorConfig;

/// Instances x annotators tables over `u8` labels with gaps; the first cell is
/// always filled so the vocabulary is never empty.
fn annotation_table() -> impl Strategy<Value = Vec<Vec<Option<u8>>>> {
    (1usize..6, 1usize..5, 2u8..5).prop_flat_map(|(annotators, instances, labels)| {
        prop::collection::vec(
            prop::collection::vec(prop::option::weighted(0.8, 0..labels), annotators),
            instances..instances + 8,
        )
        .prop_map(|mut table| {
            if table[0][0].is_none() {
                table[0][0] = Some(0);
            }
            table
        })
    })
}

fn evidence_for(table: &[Vec<Option<u8>>]) -> Evidence {
    let (codec, annotations) = encode_table(table).unwrap();
    Evidence {
        annotations,
        num_labels: codec.num_labels(),
        label_priors: None,
        controls: None,
    }
}

fn assert_rows_sum_to_one(m: &Matrix) -> Result<(), TestCaseError> {
    for (r, row) in m.iter_rows().enumerate() {
        let total: f64 = row.iter().sum();
        prop_assert!((total - 1.0).abs() < 1e-9, "row {} sums to {}", r, total);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Fresh parameters are proper distributions for any shape and seed.
    #[test]
    fn prop_initial_rows_sum_to_one(
        annotators in 1usize..10,
        labels in 1usize..8,
        smoothing in 0.0001f64..1.0,
        seed in any::<u64>(),
    ) {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let params = ParameterState::random(annotators, labels, smoothing, &mut rng);
        assert_rows_sum_to_one(&params.competence)?;
        assert_rows_sum_to_one(&params.label_preference)?;
    }

    /// Every EM M-step leaves annotated annotators' rows normalized.
    #[test]
    fn prop_em_rows_sum_to_one(table in annotation_table(), seed in any::<u64>()) {
        let evidence = evidence_for(&table);
        let smoothing = 0.01 / evidence.num_labels as f64;
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut params = ParameterState::random(
            evidence.annotations.num_annotators(),
            evidence.num_labels,
            smoothing,
            &mut rng,
        );
        let mut state = ExpectationState::for_evidence(&evidence);
        for _ in 0..5 {
            expectation_step(&evidence, &params, &mut state);
            maximize_em(&mut params, &state.counts, smoothing);
            assert_rows_sum_to_one(&params.competence)?;
            assert_rows_sum_to_one(&params.label_preference)?;
        }
    }

    /// Variational rows are sub-normalized but stay strictly positive.
    #[test]
    fn prop_variational_rows_are_bounded(table in annotation_table(), seed in any::<u64>()) {
        let evidence = evidence_for(&table);
        let annotators = evidence.annotations.num_annotators();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut params = ParameterState::random(annotators, evidence.num_labels, 0.01, &mut rng);
        let priors = Priors::new(annotators, evidence.num_labels, 0.5, 0.5);
        let mut state = ExpectationState::for_evidence(&evidence);
        for _ in 0..5 {
            expectation_step(&evidence, &params, &mut state);
            maximize_variational(&mut params, &state.counts, &priors);
            for row in params.competence.iter_rows().chain(params.label_preference.iter_rows()) {
                let total: f64 = row.iter().sum();
                prop_assert!(row.iter().all(|&p| p > 0.0));
                prop_assert!(total <= 1.0 + 1e-12, "row sums to {}", total);
            }
        }
    }

    /// Unsmoothed EM is exact maximum-likelihood EM: the log marginal
    /// likelihood is monotone up to floating-point noise.
    #[test]
    fn prop_em_log_likelihood_non_decreasing(table in annotation_table(), seed in any::<u64>()) {
        let evidence = evidence_for(&table);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut params = ParameterState::random(
            evidence.annotations.num_annotators(),
            evidence.num_labels,
            0.01,
            &mut rng,
        );
        let mut state = ExpectationState::for_evidence(&evidence);
        expectation_step(&evidence, &params, &mut state);
        let mut previous = state.log_likelihood;
        prop_assert!(previous.is_finite());

        for iteration in 0..20 {
            maximize_em(&mut params, &state.counts, 0.0);
            expectation_step(&evidence, &params, &mut state);
            let current = state.log_likelihood;
            prop_assert!(
                current >= previous - 1e-8 * (1.0 + previous.abs()),
                "iteration {}: {} < {}", iteration, current, previous
            );
            previous = current;
        }
    }

    /// Decoding never drops or invents instances, whatever the threshold.
    #[test]
    fn prop_decode_length_matches_instances(
        table in annotation_table(),
        threshold in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let config = EstimatorConfig {
            iterations: Some(5),
            restarts: Some(2),
            threshold: Some(threshold),
            seed: Some(seed),
            parallel_restarts: Some(false),
            ..Default::default()
        };
        let mut mace = MaceEstimator::new(&table, config).unwrap();
        mace.fit().unwrap();
        prop_assert_eq!(mace.decode().unwrap().len(), table.len());
        prop_assert_eq!(mace.label_entropies().unwrap().len(), table.len());
    }
}
