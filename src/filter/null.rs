use std::sync::Arc;

use super::{select_rows, FilterScratch, VectorFilter};
use crate::{
    context::{FilterContext, NullLayout},
    error::FilterError,
    selected::Selected,
};

/// Selects rows whose value in `column` is not null.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IsNotNullFilter {
    column: Arc<str>,
}

impl IsNotNullFilter {
    /// Creates a filter over the named column.
    #[must_use]
    pub fn new<N>(column: N) -> Self
    where
        N: Into<Arc<str>>,
    {
        Self {
            column: column.into(),
        }
    }

    /// Name of the tested column.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }
}

impl VectorFilter for IsNotNullFilter {
    fn check(&self, ctx: &dyn FilterContext) -> Result<(), FilterError> {
        ctx.find_column(&self.column).map(|_| ())
    }

    fn filter(
        &self,
        ctx: &dyn FilterContext,
        bound: &Selected,
        selected_in: &Selected,
        selected_out: &mut Selected,
        _scratch: &mut FilterScratch,
    ) -> Result<(), FilterError> {
        let column = ctx.find_column(&self.column)?;
        match column.null_layout() {
            // Repeating or not, every row carries a value.
            NullLayout::NoNulls => select_rows(bound, selected_in, selected_out, |_| true),
            NullLayout::Mixed => {
                select_rows(bound, selected_in, selected_out, |row| !column.is_null(row))
            }
            // The repeated value is null.
            NullLayout::AllNull => selected_out.clear(),
        }
        Ok(())
    }
}

/// Selects rows whose value in `column` is null.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IsNullFilter {
    column: Arc<str>,
}

impl IsNullFilter {
    /// Creates a filter over the named column.
    #[must_use]
    pub fn new<N>(column: N) -> Self
    where
        N: Into<Arc<str>>,
    {
        Self {
            column: column.into(),
        }
    }

    /// Name of the tested column.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }
}

impl VectorFilter for IsNullFilter {
    fn check(&self, ctx: &dyn FilterContext) -> Result<(), FilterError> {
        ctx.find_column(&self.column).map(|_| ())
    }

    fn filter(
        &self,
        ctx: &dyn FilterContext,
        bound: &Selected,
        selected_in: &Selected,
        selected_out: &mut Selected,
        _scratch: &mut FilterScratch,
    ) -> Result<(), FilterError> {
        let column = ctx.find_column(&self.column)?;
        match column.null_layout() {
            NullLayout::NoNulls => selected_out.clear(),
            NullLayout::Mixed => {
                select_rows(bound, selected_in, selected_out, |row| column.is_null(row))
            }
            NullLayout::AllNull => select_rows(bound, selected_in, selected_out, |_| true),
        }
        Ok(())
    }
}
