//! Filter trees evaluated over selection vectors.
//!
//! Every filter, leaf or composite, implements [`VectorFilter`] and obeys the
//! same three-selection contract:
//!
//! * `bound`: ascending candidate rows to test.
//! * `selected_in`: ascending rows an enclosing predicate already accepted. They are
//!   skipped and never re-emitted.
//! * `selected_out`: overwritten with the ascending subset of `bound \ selected_in`
//!   that satisfies the filter.
//!
//! Filter nodes are immutable once built. Scratch selections needed by composites
//! are checked out of a caller-owned [`FilterScratch`], so one tree can be shared by
//! any number of threads, each with its own scratch.
//!
//! Whether a batch fails never depends on its data: a composite that stops
//! early still runs [`VectorFilter::check`] on the children it skips.

mod batch;
mod compare;
mod composite;
mod null;

use std::fmt;

pub use batch::{BatchFilter, FilterState};
pub use compare::CompareFilter;
pub use composite::{AndFilter, NotFilter, OrFilter};
pub use null::{IsNotNullFilter, IsNullFilter};

use crate::{context::FilterContext, error::FilterError, option::FilterOptions, selected::Selected};

/// Predicate evaluated against one batch through selection vectors.
pub trait VectorFilter: fmt::Debug + Send + Sync {
    /// Writes the rows of `bound` that satisfy the filter and are not in `selected_in`
    /// into `selected_out`, replacing its previous contents.
    fn filter(
        &self,
        ctx: &dyn FilterContext,
        bound: &Selected,
        selected_in: &Selected,
        selected_out: &mut Selected,
        scratch: &mut FilterScratch,
    ) -> Result<(), FilterError>;

    /// Reports the configuration errors [`VectorFilter::filter`] would raise on
    /// this batch, without reading any row.
    ///
    /// Composites call it for children they skip once their result is decided,
    /// so a missing column fails every batch rather than only those where the
    /// child happens to run. Filters that read no column keep the default.
    fn check(&self, _ctx: &dyn FilterContext) -> Result<(), FilterError> {
        Ok(())
    }
}

/// Per-thread pool of reusable selections lent to composite filters.
#[derive(Debug)]
pub struct FilterScratch {
    free: Vec<Selected>,
    capacity: usize,
    short_circuit: bool,
}

impl FilterScratch {
    /// Creates an empty pool whose fresh buffers reserve `options.capacity()` rows.
    #[must_use]
    pub fn new(options: &FilterOptions) -> Self {
        Self {
            free: Vec::new(),
            capacity: options.capacity(),
            short_circuit: options.is_short_circuit(),
        }
    }

    /// Borrows an empty selection, reusing a returned one when available.
    pub fn checkout(&mut self) -> Selected {
        match self.free.pop() {
            Some(mut selected) => {
                selected.clear();
                selected
            }
            None => Selected::with_capacity(self.capacity),
        }
    }

    /// Returns a selection obtained from [`FilterScratch::checkout`].
    pub fn restore(&mut self, selected: Selected) {
        self.free.push(selected);
    }

    /// True when composites may stop once their result is decided.
    #[must_use]
    pub fn short_circuit(&self) -> bool {
        self.short_circuit
    }

    /// Number of idle buffers held by the pool.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.free.len()
    }

    pub(crate) fn set_short_circuit(&mut self, short_circuit: bool) {
        self.short_circuit = short_circuit;
    }
}

impl Default for FilterScratch {
    fn default() -> Self {
        Self::new(&FilterOptions::default())
    }
}

/// Writes every row of `bound` that is absent from `skip` and accepted by `keep`
/// into `out`.
///
/// Both inputs are ascending, so `skip` is walked with a single cursor. The
/// cursor moves past smaller entries, which keeps the walk correct when `skip`
/// holds rows outside `bound`.
#[inline]
pub(crate) fn select_rows<F>(bound: &Selected, skip: &Selected, out: &mut Selected, mut keep: F)
where
    F: FnMut(usize) -> bool,
{
    out.clear();
    let skip = skip.as_slice();
    let mut cursor = 0;
    for row in bound {
        while cursor < skip.len() && skip[cursor] < row {
            cursor += 1;
        }
        if cursor < skip.len() && skip[cursor] == row {
            cursor += 1;
            continue;
        }
        if keep(row as usize) {
            out.push(row);
        }
    }
}
