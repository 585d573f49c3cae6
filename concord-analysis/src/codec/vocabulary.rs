//! Label vocabulary with a bijective code assignment.

use std::collections::BTreeSet;
use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use concord_core::errors::EstimatorError;

/// Anything usable as an annotation value.
pub trait Label: Ord + Hash + Clone + Debug {}

impl<T: Ord + Hash + Clone + Debug> Label for T {}

/// Bijection between the observed labels and codes `0..num_labels`.
///
/// Codes follow the sorted order of the labels, so the same set of labels
/// always gets the same codes regardless of where they occur in the table.
#[derive(Debug, Clone)]
pub struct LabelCodec<T: Label> {
    labels: Vec<T>,
    codes: FxHashMap<T, u32>,
}

impl<T: Label> LabelCodec<T> {
    /// Build the vocabulary from every non-missing cell of `table`.
    pub fn from_table(table: &[Vec<Option<T>>]) -> Result<Self, EstimatorError> {
        let distinct: BTreeSet<&T> = table.iter().flatten().flatten().collect();
        Self::from_labels(distinct.into_iter().cloned())
    }

    /// Build the vocabulary from an explicit set of labels (duplicates collapse).
    pub fn from_labels(labels: impl IntoIterator<Item = T>) -> Result<Self, EstimatorError> {
        let labels: Vec<T> = labels
            .into_iter()
            .collect::<BTreeSet<T>>()
            .into_iter()
            .collect();
        if labels.is_empty() {
            return Err(EstimatorError::EmptyVocabulary);
        }
        let codes = labels
            .iter()
            .enumerate()
            .map(|(code, label)| (label.clone(), code as u32))
            .collect();
        Ok(Self { labels, codes })
    }

    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    /// Code of `label`, or `None` if it is not part of the vocabulary.
    pub fn encode(&self, label: &T) -> Option<u32> {
        self.codes.get(label).copied()
    }

    /// Like `encode`, but an unknown label is an error attributed to `context`.
    pub fn encode_known(&self, label: &T, context: &'static str) -> Result<u32, EstimatorError> {
        self.encode(label).ok_or_else(|| EstimatorError::UnknownLabel {
            label: format!("{label:?}"),
            context,
        })
    }

    /// Label for `code`, or `None` for the missing sentinel and out-of-range codes.
    pub fn decode(&self, code: u32) -> Option<&T> {
        self.labels.get(code as usize)
    }

    /// Labels in code order.
    pub fn labels(&self) -> &[T] {
        &self.labels
    }
}
