//! Decoder: entropy-gated arg-max labels and per-instance posteriors.

use std::cmp::Ordering;

use crate::codec::AnnotationMatrix;
use crate::matrix::Matrix;

/// Shannon entropy (nats) of a row of unnormalized marginals, with `0 ln 0 = 0`.
///
/// A row that sums to zero carries no usable posterior and gets `+inf`.
pub fn marginal_entropy(marginals: &[f64]) -> f64 {
    let total: f64 = marginals.iter().sum();
    if !(total > 0.0 && total.is_finite()) {
        return f64::INFINITY;
    }
    marginals
        .iter()
        .map(|&m| {
            let p = m / total;
            if p > 0.0 {
                -p * p.ln()
            } else {
                0.0
            }
        })
        .sum()
}

/// Entropy of every instance; `-inf` for instances nobody annotated.
pub fn label_entropies(marginals: &Matrix, annotations: &AnnotationMatrix) -> Vec<f64> {
    (0..annotations.num_instances())
        .map(|d| {
            if annotations.is_unannotated(d) {
                f64::NEG_INFINITY
            } else {
                marginal_entropy(marginals.row(d))
            }
        })
        .collect()
}

/// Entropy cutoff for `threshold`: the order statistic of the ascending
/// entropies at `0` for threshold 0, `n - 1` for threshold 1, otherwise
/// `floor(n * threshold)`. `None` when there are no instances.
pub fn entropy_cutoff(entropies: &[f64], threshold: f64) -> Option<f64> {
    let n = entropies.len();
    if n == 0 {
        return None;
    }
    let pivot = if threshold <= 0.0 {
        0
    } else if threshold >= 1.0 {
        n - 1
    } else {
        ((n as f64 * threshold).floor() as usize).min(n - 1)
    };
    let mut sorted = entropies.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(sorted[pivot])
}

/// Decode every instance to a label code, or `None` to abstain.
///
/// Unannotated and degenerate instances always abstain; others decode to
/// their first maximal marginal if their entropy is within the cutoff.
pub fn decode_codes(
    marginals: &Matrix,
    annotations: &AnnotationMatrix,
    threshold: f64,
) -> Vec<Option<usize>> {
    let entropies = label_entropies(marginals, annotations);
    let Some(cutoff) = entropy_cutoff(&entropies, threshold) else {
        return Vec::new();
    };

    entropies
        .iter()
        .enumerate()
        .map(|(d, &entropy)| {
            let eligible = entropy.is_finite() && entropy <= cutoff;
            if eligible {
                arg_max(marginals.row(d))
            } else {
                None
            }
        })
        .collect()
}

/// Normalized posterior of one instance as `(code, probability)`, most
/// probable first; ties keep ascending code order. Empty when the marginals
/// sum to zero.
pub fn posterior_distribution(marginals: &[f64]) -> Vec<(usize, f64)> {
    let total: f64 = marginals.iter().sum();
    if !(total > 0.0 && total.is_finite()) {
        return Vec::new();
    }
    let mut dist: Vec<(usize, f64)> = marginals
        .iter()
        .enumerate()
        .map(|(code, &m)| (code, m / total))
        .collect();
    dist.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    dist
}

/// Fraction of instances whose decoded label equals the gold label.
/// Abstentions count as misses. An empty input scores 0.
pub fn accuracy<T: PartialEq>(decoded: &[Option<T>], gold: &[T]) -> f64 {
    if gold.is_empty() {
        return 0.0;
    }
    let hits = decoded
        .iter()
        .zip(gold)
        .filter(|(d, g)| d.as_ref() == Some(*g))
        .count();
    hits as f64 / gold.len() as f64
}

fn arg_max(row: &[f64]) -> Option<usize> {
    let mut best = None;
    let mut best_value = f64::NEG_INFINITY;
    for (code, &value) in row.iter().enumerate() {
        if value > best_value {
            best_value = value;
            best = Some(code);
        }
    }
    best
}
