//! Reusable selection vectors: strictly ascending row indices within a batch.
//!
//! A [`Selected`] keeps its backing storage between batches. `clear`, `set`
//! and `initialize` only move the logical length, so a warm buffer never
//! reallocates as long as batches do not grow.

use std::{iter::Copied, slice};

use arrow::array::UInt32Array;

use crate::error::FilterError;

/// Position of a row inside the current batch.
pub type RowId = u32;

/// Ordered, duplicate-free set of row positions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selected {
    rows: Vec<RowId>,
}

impl Selected {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty selection that can hold `capacity` rows without reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
        }
    }

    /// Overwrites the selection with every row in `0..row_count`.
    pub fn initialize(&mut self, row_count: RowId) {
        self.rows.clear();
        self.rows.extend(0..row_count);
    }

    /// Number of selected rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when no row is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows the backing storage can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.rows.capacity()
    }

    /// Returns the `idx`-th selected row, if any.
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<RowId> {
        self.rows.get(idx).copied()
    }

    /// Selected rows in ascending order.
    #[must_use]
    pub fn as_slice(&self) -> &[RowId] {
        &self.rows
    }

    /// Iterates the selected rows in ascending order.
    pub fn iter(&self) -> Copied<slice::Iter<'_, RowId>> {
        self.rows.iter().copied()
    }

    /// Returns true when `row` is selected.
    #[must_use]
    pub fn contains(&self, row: RowId) -> bool {
        self.rows.binary_search(&row).is_ok()
    }

    /// Appends `row`, which must be greater than every row already selected.
    pub fn push(&mut self, row: RowId) {
        debug_assert!(
            self.rows.last().map_or(true, |last| *last < row),
            "selection rows must be pushed in ascending order"
        );
        self.rows.push(row);
    }

    /// Drops every row while keeping the backing storage.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Replaces the contents with a copy of `other`.
    pub fn set(&mut self, other: &Selected) {
        self.rows.clear();
        self.rows.extend_from_slice(&other.rows);
    }

    /// Removes every row that is also selected in `other`.
    pub fn minus(&mut self, other: &Selected) {
        let other = other.as_slice();
        if other.is_empty() {
            return;
        }
        let mut skip = 0;
        let mut write = 0;
        for read in 0..self.rows.len() {
            let row = self.rows[read];
            while skip < other.len() && other[skip] < row {
                skip += 1;
            }
            if skip < other.len() && other[skip] == row {
                skip += 1;
                continue;
            }
            self.rows[write] = row;
            write += 1;
        }
        self.rows.truncate(write);
    }

    /// Writes the ascending union of `left` and `right` into `out`.
    pub fn union_into(left: &Selected, right: &Selected, out: &mut Selected) {
        out.rows.clear();
        let (left, right) = (left.as_slice(), right.as_slice());
        let (mut l, mut r) = (0, 0);
        while l < left.len() && r < right.len() {
            match left[l].cmp(&right[r]) {
                std::cmp::Ordering::Less => {
                    out.rows.push(left[l]);
                    l += 1;
                }
                std::cmp::Ordering::Greater => {
                    out.rows.push(right[r]);
                    r += 1;
                }
                std::cmp::Ordering::Equal => {
                    out.rows.push(left[l]);
                    l += 1;
                    r += 1;
                }
            }
        }
        out.rows.extend_from_slice(&left[l..]);
        out.rows.extend_from_slice(&right[r..]);
    }

    /// Counts rows selected in both `self` and `other`.
    #[must_use]
    pub fn count_common(&self, other: &Selected) -> usize {
        let (left, right) = (self.as_slice(), other.as_slice());
        let (mut l, mut r, mut common) = (0, 0, 0);
        while l < left.len() && r < right.len() {
            match left[l].cmp(&right[r]) {
                std::cmp::Ordering::Less => l += 1,
                std::cmp::Ordering::Greater => r += 1,
                std::cmp::Ordering::Equal => {
                    common += 1;
                    l += 1;
                    r += 1;
                }
            }
        }
        common
    }

    /// Checks that rows are strictly ascending and below `row_count`.
    pub fn validate(&self, row_count: usize) -> Result<(), FilterError> {
        check_ascending(&self.rows)?;
        match self.rows.last() {
            Some(&row) if row as usize >= row_count => {
                Err(FilterError::RowOutOfRange { row, row_count })
            }
            _ => Ok(()),
        }
    }

    /// Copies the selection into an Arrow index array.
    #[must_use]
    pub fn to_indices(&self) -> UInt32Array {
        UInt32Array::from(self.rows.clone())
    }
}

fn check_ascending(rows: &[RowId]) -> Result<(), FilterError> {
    match rows.windows(2).position(|pair| pair[0] >= pair[1]) {
        Some(position) => Err(FilterError::Unsorted {
            position: position + 1,
        }),
        None => Ok(()),
    }
}

impl TryFrom<Vec<RowId>> for Selected {
    type Error = FilterError;

    fn try_from(rows: Vec<RowId>) -> Result<Self, Self::Error> {
        check_ascending(&rows)?;
        Ok(Self { rows })
    }
}

impl<'a> IntoIterator for &'a Selected {
    type Item = RowId;
    type IntoIter = Copied<slice::Iter<'a, RowId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use arrow::array::Array;

    use super::*;

    fn sel(rows: &[RowId]) -> Selected {
        Selected::try_from(rows.to_vec()).expect("ascending rows")
    }

    #[test]
    fn initialize_reuses_storage() {
        let mut selected = Selected::with_capacity(8);
        let capacity = selected.capacity();
        selected.initialize(5);
        assert_eq!(selected.as_slice(), &[0, 1, 2, 3, 4]);
        selected.initialize(3);
        assert_eq!(selected.as_slice(), &[0, 1, 2]);
        assert_eq!(selected.capacity(), capacity);
    }

    #[test]
    fn set_replaces_contents() {
        let mut selected = sel(&[1, 2, 3, 9]);
        selected.set(&sel(&[4]));
        assert_eq!(selected.as_slice(), &[4]);
        selected.set(&Selected::new());
        assert!(selected.is_empty());
    }

    #[test]
    fn minus_handles_rows_outside_self() {
        let mut selected = sel(&[1, 3, 5, 7]);
        selected.minus(&sel(&[0, 2, 3, 6, 7, 8]));
        assert_eq!(selected.as_slice(), &[1, 5]);
    }

    #[test]
    fn union_drops_duplicates() {
        let mut out = Selected::new();
        Selected::union_into(&sel(&[0, 2, 4]), &sel(&[1, 2, 5]), &mut out);
        assert_eq!(out.as_slice(), &[0, 1, 2, 4, 5]);
        Selected::union_into(&Selected::new(), &sel(&[3]), &mut out);
        assert_eq!(out.as_slice(), &[3]);
    }

    #[test]
    fn count_common_rows() {
        assert_eq!(sel(&[0, 1, 2, 7]).count_common(&sel(&[1, 7, 9])), 2);
        assert_eq!(sel(&[]).count_common(&sel(&[1])), 0);
    }

    #[test]
    fn rejects_unsorted_and_duplicate_rows() {
        assert_eq!(
            Selected::try_from(vec![0, 2, 2]),
            Err(FilterError::Unsorted { position: 2 })
        );
        assert_eq!(
            Selected::try_from(vec![3, 1]),
            Err(FilterError::Unsorted { position: 1 })
        );
    }

    #[test]
    fn validate_checks_batch_bounds() {
        let selected = sel(&[0, 4]);
        assert!(selected.validate(5).is_ok());
        assert_eq!(
            selected.validate(4),
            Err(FilterError::RowOutOfRange {
                row: 4,
                row_count: 4
            })
        );
    }

    #[test]
    fn indices_match_rows() {
        let indices = sel(&[1, 3]).to_indices();
        assert_eq!(indices.len(), 2);
        assert_eq!(indices.values().to_vec(), vec![1, 3]);
    }
}
