//! Label codec: raw annotation values <-> dense integer codes.
//!
//! Builds the label vocabulary from every distinct non-missing value in an
//! instances x annotators table and produces the coded annotation matrix
//! with its active-annotation index.

pub mod annotations;
pub mod vocabulary;

pub use annotations::{AnnotationMatrix, MISSING_CODE};
pub use vocabulary::{Label, LabelCodec};

use concord_core::errors::EstimatorError;

/// Encode a raw table in one pass: vocabulary first, then codes.
///
/// `table[d][a]` is annotator `a`'s label for instance `d`, `None` when
/// the annotator skipped it.
pub fn encode_table<T: Label>(
    table: &[Vec<Option<T>>],
) -> Result<(LabelCodec<T>, AnnotationMatrix), EstimatorError> {
    let codec = LabelCodec::from_table(table)?;
    let matrix = AnnotationMatrix::encode(table, &codec)?;
    Ok((codec, matrix))
}
