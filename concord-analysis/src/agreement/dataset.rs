//! Coders x subjects reliability table.

use concord_core::errors::AgreementError;

use crate::codec::{Label, LabelCodec};

/// Annotations laid out one row per coder, one column per subject.
#[derive(Debug, Clone, PartialEq)]
pub struct ReliabilityData<T: Label> {
    coders: Vec<Vec<Option<T>>>,
    subjects: usize,
}

impl<T: Label> ReliabilityData<T> {
    /// One sequence per coder, `None` where the coder skipped a subject.
    pub fn from_columns(coders: Vec<Vec<Option<T>>>) -> Result<Self, AgreementError> {
        let subjects = coders.first().map_or(0, Vec::len);
        if let Some((coder, row)) = coders.iter().enumerate().find(|(_, r)| r.len() != subjects) {
            return Err(AgreementError::RaggedData {
                coder,
                expected: subjects,
                found: row.len(),
            });
        }
        Ok(Self { coders, subjects })
    }

    /// One complete sequence per coder.
    pub fn from_complete_columns(coders: Vec<Vec<T>>) -> Result<Self, AgreementError> {
        Self::from_columns(
            coders
                .into_iter()
                .map(|c| c.into_iter().map(Some).collect())
                .collect(),
        )
    }

    /// Transpose an instances x annotators table.
    pub fn from_instance_rows(rows: &[Vec<Option<T>>]) -> Result<Self, AgreementError> {
        let num_coders = rows.first().map_or(0, Vec::len);
        if let Some(row) = rows.iter().find(|r| r.len() != num_coders) {
            return Err(AgreementError::RaggedData {
                coder: row.len().min(num_coders),
                expected: num_coders,
                found: row.len(),
            });
        }
        let coders = (0..num_coders)
            .map(|c| rows.iter().map(|r| r[c].clone()).collect())
            .collect();
        Ok(Self {
            coders,
            subjects: rows.len(),
        })
    }

    pub fn coders(&self) -> usize {
        self.coders.len()
    }

    pub fn subjects(&self) -> usize {
        self.subjects
    }

    pub fn coder(&self, index: usize) -> &[Option<T>] {
        &self.coders[index]
    }

    /// Back to instances x annotators, the layout the estimator consumes.
    pub fn to_instance_rows(&self) -> Vec<Vec<Option<T>>> {
        (0..self.subjects)
            .map(|s| self.coders.iter().map(|c| c[s].clone()).collect())
            .collect()
    }

    /// Encode labels to dense codes. `None` if nothing was annotated.
    pub fn encode(&self) -> Option<CodedReliability> {
        let codec = LabelCodec::from_table(&self.coders).ok()?;
        let coders = self
            .coders
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.as_ref().and_then(|l| codec.encode(l)).map(|c| c as usize))
                    .collect()
            })
            .collect();
        Some(CodedReliability {
            coders,
            subjects: self.subjects,
            num_labels: codec.num_labels(),
        })
    }
}

/// Integer-coded reliability table shared by the coefficient implementations.
#[derive(Debug, Clone)]
pub struct CodedReliability {
    pub coders: Vec<Vec<Option<usize>>>,
    pub subjects: usize,
    pub num_labels: usize,
}

impl CodedReliability {
    /// Codes assigned to `subject` by every coder that annotated it.
    pub fn subject_values(&self, subject: usize) -> impl Iterator<Item = usize> + '_ {
        self.coders.iter().filter_map(move |c| c[subject])
    }

    /// Total count of each label over the whole table.
    pub fn label_totals(&self) -> Vec<usize> {
        let mut totals = vec![0; self.num_labels];
        for code in self.coders.iter().flatten().flatten() {
            totals[*code] += 1;
        }
        totals
    }

    /// `(agreements, jointly annotated subjects)` for a pair of coders.
    pub fn pair_agreement(&self, a: usize, b: usize) -> (usize, usize) {
        self.coders[a]
            .iter()
            .zip(&self.coders[b])
            .filter_map(|(x, y)| Some((*x)? == (*y)?))
            .fold((0, 0), |(agree, total), same| (agree + usize::from(same), total + 1))
    }

    /// Mean over coder pairs of the fraction of joint subjects they agree on.
    /// Pairs with no joint subject are skipped; `None` if no pair qualifies.
    pub fn mean_pairwise_agreement(&self) -> Option<f64> {
        let mut sum = 0.0;
        let mut pairs = 0usize;
        for a in 0..self.coders.len() {
            for b in a + 1..self.coders.len() {
                let (agree, total) = self.pair_agreement(a, b);
                if total > 0 {
                    sum += agree as f64 / total as f64;
                    pairs += 1;
                }
            }
        }
        (pairs > 0).then(|| sum / pairs as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transpose_round_trip() {
        let rows = vec![
            vec![Some("x"), None],
            vec![Some("y"), Some("y")],
            vec![None, Some("x")],
        ];
        let data = ReliabilityData::from_instance_rows(&rows).unwrap();
        assert_eq!(data.coders(), 2);
        assert_eq!(data.subjects(), 3);
        assert_eq!(data.coder(1), &[None, Some("y"), Some("x")]);
        assert_eq!(data.to_instance_rows(), rows);
    }

    #[test]
    fn test_ragged_coders_rejected() {
        let err = ReliabilityData::from_complete_columns(vec![vec![1, 2, 3], vec![1, 2]]).unwrap_err();
        assert!(matches!(err, AgreementError::RaggedData { coder: 1, expected: 3, found: 2 }));
    }

    #[test]
    fn test_pair_agreement_skips_missing() {
        let data = ReliabilityData::from_columns(vec![
            vec![Some(1), Some(2), None, Some(1)],
            vec![Some(1), Some(1), Some(2), None],
        ])
        .unwrap();
        let coded = data.encode().unwrap();
        assert_eq!(coded.pair_agreement(0, 1), (1, 2));
        assert_eq!(coded.mean_pairwise_agreement(), Some(0.5));
        assert_eq!(coded.label_totals(), vec![4, 2]);
    }

    #[test]
    fn test_encode_empty_table() {
        let data: ReliabilityData<u8> =
            ReliabilityData::from_columns(vec![vec![None, None], vec![None, None]]).unwrap();
        assert!(data.encode().is_none());
    }
}
