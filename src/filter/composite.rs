//! Composite filters: conjunction, disjunction and negation over child filters.

use std::mem;

use super::{FilterScratch, VectorFilter};
use crate::{
    context::FilterContext, error::FilterError, observability::log_debug, selected::Selected,
};

/// Conjunction: every child must accept a row.
///
/// Children run in order, each on the output of the previous one, so the
/// cheapest and most selective children belong first. The result does not
/// depend on the order.
#[derive(Debug)]
pub struct AndFilter {
    children: Vec<Box<dyn VectorFilter>>,
}

impl AndFilter {
    /// Builds a conjunction; fails when `children` is empty.
    pub fn new(children: Vec<Box<dyn VectorFilter>>) -> Result<Self, FilterError> {
        if children.is_empty() {
            return Err(FilterError::EmptyComposite { op: "AND" });
        }
        log_debug!(
            component = "composite",
            event = "filter_built",
            op = "AND",
            children = children.len(),
        );
        Ok(Self { children })
    }

    /// Child filters in evaluation order.
    #[must_use]
    pub fn children(&self) -> &[Box<dyn VectorFilter>] {
        &self.children
    }
}

impl VectorFilter for AndFilter {
    fn check(&self, ctx: &dyn FilterContext) -> Result<(), FilterError> {
        check_children(&self.children, ctx)
    }

    fn filter(
        &self,
        ctx: &dyn FilterContext,
        bound: &Selected,
        selected_in: &Selected,
        selected_out: &mut Selected,
        scratch: &mut FilterScratch,
    ) -> Result<(), FilterError> {
        let mut and_bound = scratch.checkout();
        and_bound.set(bound);
        let mut result = Ok(());
        for (position, child) in self.children.iter().enumerate() {
            if and_bound.is_empty() && scratch.short_circuit() {
                result = check_children(&self.children[position..], ctx);
                break;
            }
            // `selected_in` stays fixed: it belongs to the enclosing composite.
            if let Err(err) = child.filter(ctx, &and_bound, selected_in, selected_out, scratch) {
                result = Err(err);
                break;
            }
            mem::swap(&mut and_bound, selected_out);
        }
        mem::swap(&mut and_bound, selected_out);
        scratch.restore(and_bound);
        result
    }
}

/// Disjunction: at least one child must accept a row.
///
/// Every child sees the original bound. Rows accepted by earlier children are
/// added to the skip list of later ones, so each row is accepted at most once.
#[derive(Debug)]
pub struct OrFilter {
    children: Vec<Box<dyn VectorFilter>>,
}

impl OrFilter {
    /// Builds a disjunction; fails when `children` is empty.
    pub fn new(children: Vec<Box<dyn VectorFilter>>) -> Result<Self, FilterError> {
        if children.is_empty() {
            return Err(FilterError::EmptyComposite { op: "OR" });
        }
        log_debug!(
            component = "composite",
            event = "filter_built",
            op = "OR",
            children = children.len(),
        );
        Ok(Self { children })
    }

    /// Child filters in evaluation order.
    #[must_use]
    pub fn children(&self) -> &[Box<dyn VectorFilter>] {
        &self.children
    }
}

impl VectorFilter for OrFilter {
    fn check(&self, ctx: &dyn FilterContext) -> Result<(), FilterError> {
        check_children(&self.children, ctx)
    }

    fn filter(
        &self,
        ctx: &dyn FilterContext,
        bound: &Selected,
        selected_in: &Selected,
        selected_out: &mut Selected,
        scratch: &mut FilterScratch,
    ) -> Result<(), FilterError> {
        selected_out.clear();
        // Rows that may still be accepted; the loop stops once all of them are.
        let candidates = scratch
            .short_circuit()
            .then(|| bound.len() - bound.count_common(selected_in));

        let mut skip = scratch.checkout();
        skip.set(selected_in);
        let mut child_out = scratch.checkout();
        let mut merged = scratch.checkout();
        let mut result = Ok(());
        for (position, child) in self.children.iter().enumerate() {
            if candidates == Some(selected_out.len()) {
                result = check_children(&self.children[position..], ctx);
                break;
            }
            if let Err(err) = child.filter(ctx, bound, &skip, &mut child_out, scratch) {
                result = Err(err);
                break;
            }
            if child_out.is_empty() {
                continue;
            }
            Selected::union_into(selected_out, &child_out, &mut merged);
            mem::swap(selected_out, &mut merged);
            Selected::union_into(&skip, &child_out, &mut merged);
            mem::swap(&mut skip, &mut merged);
        }
        scratch.restore(merged);
        scratch.restore(child_out);
        scratch.restore(skip);
        result
    }
}

/// Negation: rows of the bound the child rejects.
#[derive(Debug)]
pub struct NotFilter {
    child: Box<dyn VectorFilter>,
}

impl NotFilter {
    /// Wraps `child`.
    #[must_use]
    pub fn new(child: Box<dyn VectorFilter>) -> Self {
        Self { child }
    }

    /// Negated filter.
    #[must_use]
    pub fn child(&self) -> &dyn VectorFilter {
        self.child.as_ref()
    }
}

impl VectorFilter for NotFilter {
    fn check(&self, ctx: &dyn FilterContext) -> Result<(), FilterError> {
        self.child.check(ctx)
    }

    fn filter(
        &self,
        ctx: &dyn FilterContext,
        bound: &Selected,
        selected_in: &Selected,
        selected_out: &mut Selected,
        scratch: &mut FilterScratch,
    ) -> Result<(), FilterError> {
        let mut child_out = scratch.checkout();
        let result = self
            .child
            .filter(ctx, bound, selected_in, &mut child_out, scratch);
        if result.is_ok() {
            selected_out.set(bound);
            selected_out.minus(selected_in);
            selected_out.minus(&child_out);
        }
        scratch.restore(child_out);
        result
    }
}

/// Children skipped by an early exit still report configuration errors.
fn check_children(
    children: &[Box<dyn VectorFilter>],
    ctx: &dyn FilterContext,
) -> Result<(), FilterError> {
    children.iter().try_for_each(|child| child.check(ctx))
}
