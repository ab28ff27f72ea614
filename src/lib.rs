#![deny(missing_docs)]
//! Selection-vector filter algebra for predicate pushdown.
//!
//! A filter tree is evaluated against one Arrow batch at a time and yields a
//! strictly ascending list of row positions that satisfy it, so readers can
//! skip decoding and materializing the rejected rows. Leaf filters test one
//! column; composites combine children by conjunction, disjunction or
//! negation. All of them speak the same contract (see [`VectorFilter`]) and
//! exchange rows through reusable [`Selected`] buffers, so evaluation does not
//! allocate once the per-thread [`FilterState`] is warm.
//!
//! ```ignore
//! let filter = BatchFilter::new(
//!     Box::new(AndFilter::new(vec![
//!         Box::new(IsNotNullFilter::new("c")),
//!         Box::new(CompareFilter::new("v", ComparisonOp::GreaterThan, 10_i64)?),
//!     ])?),
//!     FilterOptions::default(),
//! );
//! let mut state = filter.new_state();
//! let selected = filter.evaluate(&RecordBatchContext::new(&batch), &mut state)?;
//! ```

mod observability;

/// Batch context capability and its Arrow implementation.
pub mod context;
/// Error type shared across the crate.
pub mod error;
/// Leaf and composite filters plus the per-batch driver entry point.
pub mod filter;
/// Evaluation options.
pub mod option;
/// Selection vectors.
pub mod selected;
/// Literals and comparison operators.
pub mod value;

pub use crate::{
    context::{ColumnVector, FilterContext, NullLayout, RecordBatchContext},
    error::FilterError,
    filter::{
        AndFilter, BatchFilter, CompareFilter, FilterScratch, FilterState, IsNotNullFilter,
        IsNullFilter, NotFilter, OrFilter, VectorFilter,
    },
    option::FilterOptions,
    selected::{RowId, Selected},
    value::{ComparisonOp, ScalarValue},
};
