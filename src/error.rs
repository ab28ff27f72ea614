//! Error type shared by every filter, context and selection operation.

use arrow::datatypes::DataType;
use thiserror::Error;

use crate::value::ComparisonOp;

/// Errors raised while building or evaluating a filter tree.
///
/// Every variant describes a configuration or invariant problem. Data
/// conditions such as all-null columns or empty bounds are never errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The filter references a column that the current batch does not carry.
    #[error("Unknown column: {0}")]
    ColumnNotFound(String),
    /// A composite filter was constructed without children.
    #[error("{op} filter requires at least one child")]
    EmptyComposite {
        /// Composite kind (`AND` / `OR`).
        op: &'static str,
    },
    /// Comparisons against a NULL literal never match and are rejected.
    #[error("Comparison with NULL is not allowed; use IsNull/IsNotNull")]
    NullLiteral,
    /// The column type cannot be compared with the supplied literal.
    #[error("Unsupported comparison {op} for column '{column}' of type {data_type:?}")]
    UnsupportedComparison {
        /// Column under comparison.
        column: String,
        /// Arrow type of the column.
        data_type: DataType,
        /// Requested operator.
        op: ComparisonOp,
    },
    /// A constant column did not hold exactly one value.
    #[error("Constant column '{column}' must hold exactly one value, got {len}")]
    InvalidConstant {
        /// Column name.
        column: String,
        /// Observed array length.
        len: usize,
    },
    /// The batch holds more rows than a [`RowId`](crate::RowId) can address.
    #[error("Batch of {row_count} rows exceeds the addressable row range")]
    BatchTooLarge {
        /// Number of rows in the batch.
        row_count: usize,
    },
    /// A selection was not strictly ascending.
    #[error("Selection is not strictly ascending at position {position}")]
    Unsorted {
        /// Index of the first offending entry.
        position: usize,
    },
    /// A selection referenced a row outside the current batch.
    #[error("Selected row {row} is outside a batch of {row_count} rows")]
    RowOutOfRange {
        /// Offending row index.
        row: u32,
        /// Number of rows in the batch.
        row_count: usize,
    },
}
