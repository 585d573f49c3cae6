//! Maximization steps: turn fractional counts back into distributions.

use statrs::function::gamma::digamma;

use crate::matrix::Matrix;

use super::params::{Accumulators, ParameterState, Priors};

/// Frequentist M-step: add-`smoothing` counts, row-normalized.
pub fn maximize_em(params: &mut ParameterState, counts: &Accumulators, smoothing: f64) {
    params.competence.clone_from(&counts.competence);
    params.competence.add_scalar(smoothing);
    params.competence.normalize_rows();

    params.label_preference.clone_from(&counts.label_preference);
    params.label_preference.add_scalar(smoothing);
    params.label_preference.normalize_rows();
}

/// Variational-Bayes M-step: prior pseudo-counts plus evidence, then
/// `exp(digamma(count)) / exp(digamma(row_sum))` per cell.
///
/// Rows come out slightly sub-normalized; sparse rows shrink the most.
pub fn maximize_variational(params: &mut ParameterState, counts: &Accumulators, priors: &Priors) {
    params.competence.clone_from(&counts.competence);
    params.competence.add_matrix(&priors.competence);
    digamma_normalize_rows(&mut params.competence);

    params.label_preference.clone_from(&counts.label_preference);
    params.label_preference.add_matrix(&priors.label_preference);
    digamma_normalize_rows(&mut params.label_preference);
}

fn digamma_normalize_rows(m: &mut Matrix) {
    for r in 0..m.rows() {
        let row = m.row_mut(r);
        let total = digamma(row.iter().sum()).exp();
        for x in row.iter_mut() {
            *x = digamma(*x).exp() / total;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mace::params::{GUESSES, KNOWS};

    fn counts() -> Accumulators {
        let mut acc = Accumulators::new(2, 3);
        acc.competence.set(0, KNOWS, 9.0);
        acc.competence.set(0, GUESSES, 1.0);
        acc.label_preference.set(0, 2, 1.0);
        acc.competence.set(1, GUESSES, 0.5);
        acc.label_preference.set(1, 0, 0.5);
        acc
    }

    fn blank() -> ParameterState {
        ParameterState {
            competence: Matrix::zeros(2, 2),
            label_preference: Matrix::zeros(2, 3),
        }
    }

    #[test]
    fn test_em_normalizes_with_smoothing() {
        let mut params = blank();
        maximize_em(&mut params, &counts(), 0.5);

        assert!((params.competence.get(0, KNOWS) - 9.5 / 11.0).abs() < 1e-12);
        // Annotator 0 never guessed labels 0 or 1: smoothing alone.
        assert!((params.label_preference.get(0, 0) - 0.5 / 2.5).abs() < 1e-12);
        for row in params.competence.iter_rows().chain(params.label_preference.iter_rows()) {
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_variational_rows_positive_and_sub_normalized() {
        let mut params = blank();
        let priors = Priors::new(2, 3, 0.5, 0.5);
        maximize_variational(&mut params, &counts(), &priors);

        for row in params.competence.iter_rows().chain(params.label_preference.iter_rows()) {
            let sum: f64 = row.iter().sum();
            assert!(row.iter().all(|&p| p > 0.0));
            assert!(sum <= 1.0 + 1e-12 && sum > 0.5, "row sum {sum}");
        }
    }

    #[test]
    fn test_variational_shrinks_sparse_annotators() {
        let mut params = blank();
        let priors = Priors::new(2, 3, 0.5, 0.5);
        maximize_variational(&mut params, &counts(), &priors);

        // Same direction of evidence, but annotator 0 has far more of it.
        let plain_ratio = 9.5 / 10.5;
        let vb = params.competence.get(0, KNOWS);
        assert!(vb < plain_ratio);
        assert!(vb > params.competence.get(1, KNOWS));
    }
}
