//! Integer-coded annotation matrix and its active-annotation index.

use concord_core::errors::EstimatorError;

use super::vocabulary::{Label, LabelCodec};

/// Reserved code for "no annotation". Never a valid label code.
pub const MISSING_CODE: u32 = u32::MAX;

/// Immutable instances x annotators matrix of label codes.
#[derive(Debug, Clone)]
pub struct AnnotationMatrix {
    num_instances: usize,
    num_annotators: usize,
    codes: Vec<u32>,
    /// Per instance, ascending indices of annotators with a real annotation.
    active: Vec<Vec<usize>>,
}

impl AnnotationMatrix {
    /// Encode `table` with `codec`. Every row must have the same width.
    pub fn encode<T: Label>(
        table: &[Vec<Option<T>>],
        codec: &LabelCodec<T>,
    ) -> Result<Self, EstimatorError> {
        let num_annotators = table.first().map_or(0, Vec::len);
        let mut codes = Vec::with_capacity(table.len() * num_annotators);
        let mut active = Vec::with_capacity(table.len());

        for (d, row) in table.iter().enumerate() {
            if row.len() != num_annotators {
                return Err(EstimatorError::RaggedTable {
                    row: d,
                    expected: num_annotators,
                    found: row.len(),
                });
            }
            let mut row_active = Vec::new();
            for (a, cell) in row.iter().enumerate() {
                let code = match cell {
                    Some(label) => {
                        row_active.push(a);
                        codec.encode_known(label, "annotation table")?
                    }
                    None => MISSING_CODE,
                };
                codes.push(code);
            }
            active.push(row_active);
        }

        Ok(Self {
            num_instances: table.len(),
            num_annotators,
            codes,
            active,
        })
    }

    pub fn num_instances(&self) -> usize {
        self.num_instances
    }

    pub fn num_annotators(&self) -> usize {
        self.num_annotators
    }

    /// Raw code at (instance, annotator); `MISSING_CODE` if unannotated.
    #[inline]
    pub fn code(&self, instance: usize, annotator: usize) -> u32 {
        self.codes[instance * self.num_annotators + annotator]
    }

    /// Label index at (instance, annotator), `None` if unannotated.
    #[inline]
    pub fn label(&self, instance: usize, annotator: usize) -> Option<usize> {
        match self.code(instance, annotator) {
            MISSING_CODE => None,
            code => Some(code as usize),
        }
    }

    /// Annotators that labeled `instance`, ascending.
    pub fn active_annotators(&self, instance: usize) -> &[usize] {
        &self.active[instance]
    }

    /// True when no annotator labeled `instance`.
    pub fn is_unannotated(&self, instance: usize) -> bool {
        self.active[instance].is_empty()
    }
}
