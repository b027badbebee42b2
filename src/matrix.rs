//! The matrix store and its dimension-sorted iteration order (the "view").

use crate::columns::Column;

/// A dimension-sorted permutation of cell indices, partitioned into
/// per-dimension blocks.
///
/// `order[start[dim] .. start[dim] + count[dim])` enumerates, in increasing
/// original order, the cell indices of dimension `dim`. The view is a purely
/// logical iteration order: it never reorders the underlying storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    order: Vec<usize>,
    start: Vec<usize>,
    count: Vec<usize>,
}

impl View {
    /// Builds a view from an arbitrary (possibly sparse) stream of
    /// `(dimension, cell_index)` pairs, bucketing by dimension and sorting
    /// each bucket by ascending cell index.
    pub fn from_dims(n_dimensions: usize, entries: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); n_dimensions];
        for (dim, id) in entries {
            buckets[dim].push(id);
        }
        for bucket in buckets.iter_mut() {
            bucket.sort_unstable();
        }
        let mut order = Vec::new();
        let mut start = Vec::with_capacity(n_dimensions);
        let mut count = Vec::with_capacity(n_dimensions);
        for bucket in buckets {
            start.push(order.len());
            count.push(bucket.len());
            order.extend(bucket);
        }
        Self { order, start, count }
    }

    pub fn n_dimensions(&self) -> usize {
        self.start.len()
    }

    pub fn start(&self, dim: usize) -> usize {
        self.start[dim]
    }

    pub fn count(&self, dim: usize) -> usize {
        self.count[dim]
    }

    pub fn set_start(&mut self, dim: usize, start: usize) {
        self.start[dim] = start;
    }

    pub fn set_count(&mut self, dim: usize, count: usize) {
        self.count[dim] = count;
    }

    pub fn get(&self, idx_view: usize) -> usize {
        self.order[idx_view]
    }

    pub fn set(&mut self, idx_view: usize, cell: usize) {
        self.order[idx_view] = cell;
    }

    /// The cell indices of dimension `dim`, in increasing original order.
    pub fn block(&self, dim: usize) -> &[usize] {
        &self.order[self.start[dim]..self.start[dim] + self.count[dim]]
    }

    /// All dimension blocks in ascending dimension order.
    pub fn blocks(&self) -> impl Iterator<Item = &[usize]> {
        (0..self.n_dimensions()).map(move |dim| self.block(dim))
    }

    pub fn total_len(&self) -> usize {
        self.order.len()
    }
}

/// An indexed collection of columns together with a per-column dimension tag
/// and a [`View`] giving the dimension-sorted processing order.
///
/// Cell index, array index and birth/death label all coincide: column `c`
/// always refers to cell `c`.
#[derive(Debug, Clone, Default)]
pub struct Matrix<C: Column> {
    columns: Vec<C>,
    view: View,
}

impl<C: Column> Matrix<C> {
    /// Builds a matrix from columns, each already tagged with its dimension
    /// (via [`Column::dimension`]), creating the view in the same pass.
    pub fn new(columns: Vec<C>) -> Self {
        let n_dimensions = columns.iter().map(|c| c.dimension()).max().map_or(0, |d| d + 1);
        let view = View::from_dims(n_dimensions, columns.iter().enumerate().map(|(i, c)| (c.dimension(), i)));
        Self { columns, view }
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, idx: usize) -> &C {
        &self.columns[idx]
    }

    pub fn column_mut(&mut self, idx: usize) -> &mut C {
        &mut self.columns[idx]
    }

    pub fn columns(&self) -> &[C] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<C> {
        self.columns
    }

    pub fn set_column(&mut self, idx: usize, column: C) {
        self.columns[idx] = column;
    }

    pub fn dimension(&self, idx: usize) -> usize {
        self.columns[idx].dimension()
    }

    pub fn set_dimension(&mut self, idx: usize, dim: usize) {
        self.columns[idx].set_dimension(dim);
    }

    pub fn append(&mut self, column: C) {
        self.columns.push(column);
    }

    pub fn swap(&mut self, i: usize, j: usize) {
        self.columns.swap(i, j);
    }

    /// Removes column `idx`, shifting later columns down by one. The view is
    /// left stale; callers that erase columns are expected to rebuild it.
    pub fn erase(&mut self, idx: usize) -> C {
        self.columns.remove(idx)
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    /// Rebuilds [`Self::view`] from the columns' current dimension tags.
    pub fn create_view(&mut self) {
        let n_dimensions = self.columns.iter().map(|c| c.dimension()).max().map_or(0, |d| d + 1);
        self.view = View::from_dims(
            n_dimensions,
            self.columns.iter().enumerate().map(|(i, c)| (c.dimension(), i)),
        );
    }

    /// Adds one copy of the column at `src` into the column at `dst`. `src`
    /// and `dst` must be distinct.
    pub fn add_into(&mut self, src: usize, dst: usize) {
        debug_assert_ne!(src, dst);
        if src < dst {
            let (left, right) = self.columns.split_at_mut(dst);
            right[0].add_col(&left[src]);
        } else {
            let (left, right) = self.columns.split_at_mut(src);
            left[dst].add_col(&right[0]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::VecColumn;

    fn sample() -> Matrix<VecColumn> {
        Matrix::new(
            vec![
                (0, vec![]),
                (0, vec![]),
                (1, vec![0, 1]),
                (2, vec![0usize]),
            ]
            .into_iter()
            .map(VecColumn::from)
            .collect(),
        )
    }

    #[test]
    fn view_partitions_by_dimension_in_order() {
        let m = sample();
        assert_eq!(m.view().block(0), &[0, 1]);
        assert_eq!(m.view().block(1), &[2]);
        assert_eq!(m.view().block(2), &[3]);
    }

    #[test]
    fn add_into_is_disjoint_borrow_safe() {
        let mut m = sample();
        m.add_into(0, 2);
        assert!(m.column(2).has_entry(&0));
    }
}
