//! Common helpers for filter integration tests.

use std::sync::Arc;

use arrow::{
    array::{ArrayRef, Int64Array},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use vector_filter::{FilterContext, FilterScratch, Selected, VectorFilter};

/// Builds a selection from ascending rows.
pub fn sel(rows: &[u32]) -> Selected {
    Selected::try_from(rows.to_vec()).expect("ascending rows")
}

/// Builds a batch of nullable Int64 columns.
pub fn int_batch(columns: Vec<(&str, Vec<Option<i64>>)>) -> RecordBatch {
    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, _)| Field::new(*name, DataType::Int64, true))
        .collect();
    let arrays: Vec<ArrayRef> = columns
        .into_iter()
        .map(|(_, values)| Arc::new(Int64Array::from(values)) as ArrayRef)
        .collect();
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).expect("batch")
}

/// Evaluates `filter` once and returns the selected rows.
pub fn eval(
    filter: &dyn VectorFilter,
    ctx: &dyn FilterContext,
    bound: &Selected,
    selected_in: &Selected,
) -> Vec<u32> {
    let mut out = Selected::new();
    let mut scratch = FilterScratch::default();
    filter
        .filter(ctx, bound, selected_in, &mut out, &mut scratch)
        .expect("filter evaluation succeeds");
    out.as_slice().to_vec()
}

/// Asserts the ascending, duplicate-free and subset-of-bound invariants.
pub fn assert_selection_invariants(out: &[u32], bound: &Selected) {
    assert!(
        out.windows(2).all(|pair| pair[0] < pair[1]),
        "output not strictly ascending: {out:?}"
    );
    for row in out {
        assert!(bound.contains(*row), "row {row} outside bound {bound:?}");
    }
}
