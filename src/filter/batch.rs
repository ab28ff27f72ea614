use super::{FilterScratch, VectorFilter};
use crate::{
    context::FilterContext,
    error::FilterError,
    observability::{log_debug, log_warn},
    option::FilterOptions,
    selected::{RowId, Selected},
};

/// Root of a filter tree, evaluated once per batch.
///
/// The tree is immutable and can be shared across threads (for example behind
/// an `Arc`). Each thread evaluates with its own [`FilterState`].
#[derive(Debug)]
pub struct BatchFilter {
    root: Box<dyn VectorFilter>,
    options: FilterOptions,
}

impl BatchFilter {
    /// Wraps `root` with the given evaluation options.
    #[must_use]
    pub fn new(root: Box<dyn VectorFilter>, options: FilterOptions) -> Self {
        log_debug!(
            component = "batch",
            event = "filter_built",
            short_circuit = options.is_short_circuit(),
            validate_output = options.is_validating(),
        );
        Self { root, options }
    }

    /// Evaluation options.
    #[must_use]
    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    /// Creates evaluation state sized for this filter's options.
    #[must_use]
    pub fn new_state(&self) -> FilterState {
        FilterState::new(&self.options)
    }

    /// Evaluates the tree against every row of the batch behind `ctx`.
    ///
    /// The returned selection borrows from `state` and stays valid until the
    /// next evaluation with the same state.
    pub fn evaluate<'s>(
        &self,
        ctx: &dyn FilterContext,
        state: &'s mut FilterState,
    ) -> Result<&'s Selected, FilterError> {
        let row_count = ctx.row_count();
        let rows =
            RowId::try_from(row_count).map_err(|_| FilterError::BatchTooLarge { row_count })?;

        let FilterState {
            bound,
            selected_in,
            selected_out,
            scratch,
        } = state;
        bound.initialize(rows);
        selected_in.clear();
        scratch.set_short_circuit(self.options.is_short_circuit());

        self.root
            .filter(ctx, bound, selected_in, selected_out, scratch)?;

        if self.options.is_validating() {
            if let Err(err) = selected_out.validate(row_count) {
                log_warn!(
                    component = "batch",
                    event = "selection_invalid",
                    rows = row_count,
                    error = %err,
                );
                return Err(err);
            }
        }
        log_debug!(
            component = "batch",
            event = "batch_filtered",
            rows = row_count,
            selected = selected_out.len(),
        );
        Ok(selected_out)
    }
}

/// Per-thread buffers reused across batch evaluations.
#[derive(Debug)]
pub struct FilterState {
    bound: Selected,
    selected_in: Selected,
    selected_out: Selected,
    scratch: FilterScratch,
}

impl FilterState {
    /// Allocates buffers sized by `options`.
    #[must_use]
    pub fn new(options: &FilterOptions) -> Self {
        let capacity = options.capacity();
        Self {
            bound: Selected::with_capacity(capacity),
            selected_in: Selected::with_capacity(capacity),
            selected_out: Selected::with_capacity(capacity),
            scratch: FilterScratch::new(options),
        }
    }

    /// Selection produced by the most recent evaluation.
    #[must_use]
    pub fn selected(&self) -> &Selected {
        &self.selected_out
    }
}
