//! Read-only view of the batch a filter tree is evaluated against.
//!
//! Filters only ever ask three questions of a column: does it hold any null,
//! does a single value repeat across the batch, and is a given row null.
//! Richer leaves additionally read values through [`ColumnVector::array`].

mod record_batch;

use arrow::{array::Array, buffer::NullBuffer, datatypes::DataType};

pub use record_batch::RecordBatchContext;

use crate::error::FilterError;

/// Capability handed to filters for the duration of one batch evaluation.
pub trait FilterContext {
    /// Looks up a column of the current batch by name.
    ///
    /// Fails with [`FilterError::ColumnNotFound`] when the batch does not carry
    /// the column; callers should fail the batch rather than skip the filter.
    fn find_column(&self, name: &str) -> Result<ColumnVector<'_>, FilterError>;

    /// Number of rows in the current batch.
    fn row_count(&self) -> usize;
}

/// Per-batch null statistics of a column, decided once before any row is read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NullLayout {
    /// No row is null, whether or not the column repeats.
    NoNulls,
    /// Nulls are present and must be checked row by row.
    Mixed,
    /// The column repeats a single null value; every row is null.
    AllNull,
}

/// Null statistics and values of one column within the current batch.
///
/// Nulls are read from the array's logical null mask, so dictionary values,
/// run-end encoded runs and union children that are null count as null rows
/// even though the array carries no validity buffer of its own.
#[derive(Clone, Debug)]
pub struct ColumnVector<'a> {
    array: &'a dyn Array,
    nulls: Option<NullBuffer>,
    no_nulls: bool,
    repeating: bool,
}

impl<'a> ColumnVector<'a> {
    /// Column whose rows map one-to-one onto `array` slots.
    ///
    /// An Arrow `Null`-typed array is reported as a repeating null.
    #[must_use]
    pub fn new(array: &'a dyn Array) -> Self {
        let repeating = matches!(array.data_type(), DataType::Null);
        Self::with_layout(array, repeating)
    }

    /// Column whose single slot at index 0 stands for every row of the batch.
    #[must_use]
    pub fn repeating(array: &'a dyn Array) -> Self {
        Self::with_layout(array, true)
    }

    fn with_layout(array: &'a dyn Array, repeating: bool) -> Self {
        let nulls = array.logical_nulls();
        let no_nulls = nulls.as_ref().map_or(true, |nulls| nulls.null_count() == 0);
        Self {
            array,
            nulls,
            no_nulls,
            repeating,
        }
    }

    /// True when no row of the batch is null.
    #[must_use]
    pub fn no_nulls(&self) -> bool {
        self.no_nulls
    }

    /// True when every row shares the value stored at index 0.
    #[must_use]
    pub fn is_repeating(&self) -> bool {
        self.repeating
    }

    /// Classifies the column so filters can pick a fast path per batch.
    #[must_use]
    pub fn null_layout(&self) -> NullLayout {
        if self.no_nulls {
            NullLayout::NoNulls
        } else if !self.repeating {
            NullLayout::Mixed
        } else {
            NullLayout::AllNull
        }
    }

    /// Returns true when `row` is null.
    #[must_use]
    pub fn is_null(&self, row: usize) -> bool {
        match &self.nulls {
            Some(nulls) if !self.no_nulls => nulls.is_null(self.value_index(row)),
            _ => false,
        }
    }

    /// Slot of the backing array that holds the value of `row`.
    #[must_use]
    pub fn value_index(&self, row: usize) -> usize {
        if self.repeating {
            0
        } else {
            row
        }
    }

    /// Backing Arrow array.
    #[must_use]
    pub fn array(&self) -> &'a dyn Array {
        self.array
    }
}
