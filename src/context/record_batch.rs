use std::sync::Arc;

use arrow::{
    array::{Array, ArrayRef},
    record_batch::RecordBatch,
};

use super::{ColumnVector, FilterContext};
use crate::{error::FilterError, observability::log_warn};

/// [`FilterContext`] over an Arrow [`RecordBatch`].
///
/// Constant columns (for example partition values that are identical for
/// every row) are registered as length-1 arrays and surface as repeating
/// columns. They shadow batch columns of the same name.
#[derive(Clone, Debug)]
pub struct RecordBatchContext<'a> {
    batch: &'a RecordBatch,
    constants: Vec<(Arc<str>, ArrayRef)>,
}

impl<'a> RecordBatchContext<'a> {
    /// Wraps `batch` without any constant columns.
    #[must_use]
    pub fn new(batch: &'a RecordBatch) -> Self {
        Self {
            batch,
            constants: Vec::new(),
        }
    }

    /// Registers `array` as a column whose single value repeats across the batch.
    pub fn with_constant<N>(mut self, name: N, array: ArrayRef) -> Result<Self, FilterError>
    where
        N: Into<Arc<str>>,
    {
        let name = name.into();
        if array.len() != 1 {
            return Err(FilterError::InvalidConstant {
                column: name.to_string(),
                len: array.len(),
            });
        }
        self.constants.retain(|(existing, _)| existing != &name);
        self.constants.push((name, array));
        Ok(self)
    }

    /// Underlying batch.
    #[must_use]
    pub fn batch(&self) -> &'a RecordBatch {
        self.batch
    }
}

impl FilterContext for RecordBatchContext<'_> {
    fn find_column(&self, name: &str) -> Result<ColumnVector<'_>, FilterError> {
        if let Some((_, array)) = self
            .constants
            .iter()
            .find(|(constant, _)| constant.as_ref() == name)
        {
            return Ok(ColumnVector::repeating(array.as_ref()));
        }
        match self.batch.column_by_name(name) {
            Some(array) => Ok(ColumnVector::new(array.as_ref())),
            None => {
                log_warn!(
                    component = "context",
                    event = "column_not_found",
                    column = name,
                    columns = self.batch.num_columns(),
                );
                Err(FilterError::ColumnNotFound(name.to_owned()))
            }
        }
    }

    fn row_count(&self) -> usize {
        self.batch.num_rows()
    }
}
