//! Lock-free parallel reduction, an optional path layered on top of the
//! serial reducers in [`crate::reduce`] for when a thread pool is
//! requested (`SteenroderOptions::parallel`).
//!
//! Grounded in the teacher's lock-free algorithm of Morozov and Nigmetov
//! (`examples/tomchaplin-lophat/src/algorithms/lock_free.rs`): every column
//! in a dimension block races to claim its pivot row via compare-exchange on
//! an atomic pivot table; a column that loses a race to a column further
//! right switches to reducing that column instead. Dimension blocks are
//! still processed one at a time, descending, with a barrier between them
//! (`§5`'s "mandatory `sync`" before cross-block observation), since a
//! block's clearing step depends on every column in it having finished
//! racing for pivots.

use crossbeam::atomic::AtomicCell;
use pinboard::{GuardedRef, NonEmptyPinboard};
use rayon::prelude::*;

use crate::columns::Column;
use crate::matrix::Matrix;
use crate::options::SteenroderOptions;

enum ThreadPool {
    #[cfg(not(feature = "local_thread_pool"))]
    Global,
    #[cfg(feature = "local_thread_pool")]
    Local(rayon::ThreadPool),
}

impl ThreadPool {
    fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        match self {
            #[cfg(not(feature = "local_thread_pool"))]
            ThreadPool::Global => op(),
            #[cfg(feature = "local_thread_pool")]
            ThreadPool::Local(pool) => pool.install(op),
        }
    }

    fn build(options: &SteenroderOptions) -> Self {
        #[cfg(feature = "local_thread_pool")]
        {
            let mut builder = rayon::ThreadPoolBuilder::new();
            if options.num_threads != 0 {
                builder = builder.num_threads(options.num_threads);
            }
            ThreadPool::Local(builder.build().expect("failed to build thread pool"))
        }
        #[cfg(not(feature = "local_thread_pool"))]
        {
            if options.num_threads != 0 {
                panic!("To specify a number of threads, enable the local_thread_pool feature");
            }
            ThreadPool::Global
        }
    }
}

/// Holds each column (reduced matrix + witness, paired) behind a
/// [`NonEmptyPinboard`] so threads can swap it in lock-free, plus one
/// [`AtomicCell`] pivot owner per row.
struct ParallelReducer<C: Column + 'static> {
    cells: Vec<NonEmptyPinboard<(C, C)>>,
    pivots: Vec<AtomicCell<Option<usize>>>,
    thread_pool: ThreadPool,
    min_chunk_len: usize,
}

impl<C: Column + 'static> ParallelReducer<C> {
    fn new(matrix: &Matrix<C>, witness: &Matrix<C>, options: &SteenroderOptions) -> Self {
        let n = matrix.n_columns();
        let cells = (0..n)
            .map(|i| NonEmptyPinboard::new((matrix.column(i).clone(), witness.column(i).clone())))
            .collect();
        let pivots = (0..n).map(|_| AtomicCell::new(None)).collect();
        Self {
            cells,
            pivots,
            thread_pool: ThreadPool::build(options),
            min_chunk_len: options.min_chunk_len.max(1),
        }
    }

    /// Returns the column currently claiming pivot row `l`, if any, retrying
    /// until the claimant's own pivot is consistent with the pivot table
    /// (it may be mid-reduction on another thread).
    fn get_col_with_pivot(&self, l: usize) -> Option<(usize, GuardedRef<(C, C)>)> {
        loop {
            let piv = self.pivots[l].load()?;
            let cols = self.cells[piv].get_ref();
            if cols.0.pivot() != Some(l) {
                continue;
            }
            return Some((piv, cols));
        }
    }

    /// Reduces column `j` as far as possible, switching to reduce a column
    /// further right if it wins the race for a pivot row `j` also wants.
    fn reduce_column(&self, j: usize) {
        let mut working_j = j;
        'outer: loop {
            let mut curr = self.cells[working_j].read();
            while let Some(l) = curr.0.pivot() {
                match self.get_col_with_pivot(l) {
                    Some((piv, piv_col)) if piv < working_j => {
                        curr.0.add_col(&piv_col.0);
                        curr.1.add_col(&piv_col.1);
                    }
                    Some((piv, _)) if piv > working_j => {
                        self.cells[working_j].set(curr);
                        if self.pivots[l].compare_exchange(Some(piv), Some(working_j)).is_ok() {
                            working_j = piv;
                        }
                        continue 'outer;
                    }
                    Some(_) => unreachable!("a column cannot contest its own pivot"),
                    None => {
                        self.cells[working_j].set(curr);
                        if self.pivots[l].compare_exchange(None, Some(working_j)).is_ok() {
                            return;
                        }
                        continue 'outer;
                    }
                }
            }
            self.cells[working_j].set(curr);
            return;
        }
    }

    /// Twist-style clearing: for a column that just claimed a pivot row,
    /// empty out the column sitting at that row, since it is now known to
    /// be redundant.
    fn clear_with_column(&self, boundary_idx: usize) {
        let boundary = self.cells[boundary_idx].get_ref();
        let Some(clearing_idx) = boundary.0.pivot() else {
            return;
        };
        let clearing_dim = self.cells[clearing_idx].get_ref().0.dimension();
        self.cells[clearing_idx].set((
            C::new_with_dimension(clearing_dim),
            C::new_with_dimension(clearing_dim),
        ));
    }

    fn reduce_block(&self, block: &[usize]) {
        self.thread_pool.install(|| {
            block
                .par_iter()
                .with_min_len(self.min_chunk_len)
                .for_each(|&j| self.reduce_column(j));
        });
    }

    fn clear_block(&self, block: &[usize]) {
        self.thread_pool.install(|| {
            block
                .par_iter()
                .with_min_len(self.min_chunk_len)
                .filter(|&&j| self.cells[j].get_ref().0.is_boundary())
                .for_each(|&j| self.clear_with_column(j));
        });
    }
}

/// Reduces `matrix` in place, carrying `witness` alongside, using the
/// lock-free parallel algorithm. Honors `options.clearing` exactly as
/// [`crate::reduce::reduce_twist`] does: dimension blocks descending,
/// dimension `0` skipped, and the column at a just-claimed pivot row cleared
/// once its whole block has finished racing for pivots.
pub fn reduce_parallel<C: Column + 'static>(
    matrix: &mut Matrix<C>,
    witness: &mut Matrix<C>,
    options: &SteenroderOptions,
) {
    let reducer = ParallelReducer::new(matrix, witness, options);

    if options.clearing {
        // Twist-style: one barrier per dimension, descending, dimension 0
        // skipped, so clearing never races with a not-yet-processed block.
        let n_dimensions = matrix.view().n_dimensions();
        for dim in (1..n_dimensions).rev() {
            let block: Vec<usize> = matrix.view().block(dim).to_vec();
            reducer.reduce_block(&block);
            reducer.clear_block(&block);
        }
    } else {
        // Standard-style: dimension-agnostic, a single block over every
        // index, matching `reduce_standard`'s plain ascending-index order.
        let block: Vec<usize> = (0..matrix.n_columns()).collect();
        reducer.reduce_block(&block);
    }

    for i in 0..matrix.n_columns() {
        let (r, v) = reducer.cells[i].read();
        matrix.set_column(i, r);
        witness.set_column(i, v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::VecColumn;
    use crate::reduce::{reduce_standard, reduce_twist};
    use proptest::collection::hash_set;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn identity_witness(cols: &[VecColumn]) -> Matrix<VecColumn> {
        Matrix::new(
            cols.iter()
                .enumerate()
                .map(|(i, c)| VecColumn::from((c.dimension(), vec![i])))
                .collect(),
        )
    }

    fn pivots_of(m: &Matrix<VecColumn>) -> HashSet<usize> {
        (0..m.n_columns()).filter_map(|c| m.column(c).pivot()).collect()
    }

    // Strict upper triangular matrix (every column's entries are below its
    // own index) so reduction always terminates regardless of order.
    fn sut_matrix(size: usize) -> impl Strategy<Value = Vec<VecColumn>> {
        (1..size)
            .map(|i| veccolumn_with_idxs_below(i))
            .collect::<Vec<_>>()
    }

    fn veccolumn_with_idxs_below(max_idx: usize) -> impl Strategy<Value = VecColumn> {
        let max_idx = max_idx.max(1);
        hash_set(0..max_idx, 0..max_idx).prop_map(|set| {
            let mut col: Vec<_> = set.into_iter().collect();
            col.sort_unstable();
            VecColumn::from((0, col))
        })
    }

    proptest! {
        #[test]
        fn parallel_standard_agrees_with_serial_standard(cols in sut_matrix(60)) {
            let mut serial = Matrix::new(cols.clone());
            let mut sw = identity_witness(&cols);
            reduce_standard(&mut serial, &mut sw);

            let mut parallel = Matrix::new(cols.clone());
            let mut pw = identity_witness(&cols);
            let options = SteenroderOptions { clearing: false, ..SteenroderOptions::default() };
            reduce_parallel(&mut parallel, &mut pw, &options);

            prop_assert_eq!(pivots_of(&serial), pivots_of(&parallel));
        }
    }

    #[test]
    fn parallel_twist_leaves_no_duplicate_pivots() {
        // vertices 0,1,2; edges 3(01),4(02),5(12); face 6
        let cols: Vec<VecColumn> = vec![
            (0, vec![]),
            (0, vec![]),
            (0, vec![]),
            (1, vec![0, 1]),
            (1, vec![0, 2]),
            (1, vec![1, 2]),
            (2, vec![3, 4, 5]),
        ]
        .into_iter()
        .map(VecColumn::from)
        .collect();

        let mut serial = Matrix::new(cols.clone());
        let mut sw = identity_witness(&cols);
        reduce_twist(&mut serial, &mut sw);

        let mut parallel = Matrix::new(cols.clone());
        let mut pw = identity_witness(&cols);
        let options = SteenroderOptions::default();
        reduce_parallel(&mut parallel, &mut pw, &options);

        let pivots = pivots_of(&parallel);
        assert_eq!(pivots.len(), pivots_of(&serial).len());
        let mut seen = HashSet::new();
        for c in 0..parallel.n_columns() {
            if let Some(p) = parallel.column(c).pivot() {
                assert!(seen.insert(p), "duplicate pivot {p}");
            }
        }
    }
}
