//! Vertex-support ("simplex") columns, built by recursive descent through the
//! boundary operator.

use hashbrown::HashMap;

use crate::columns::Column;
use crate::matrix::Matrix;

/// Vertex supports of cells of dimension `d` or `d+k`, keyed by cell index,
/// plus the reverse lookup `(dimension, sorted vertex support) -> cell index`
/// needed by [`crate::steenrod::steenrod_square`] to find the cell a union of
/// vertex supports corresponds to.
///
/// Grounded in `simplex_matrix.hpp::build_simplex`/`is_in`.
#[derive(Debug, Clone, Default)]
pub struct SimplexMatrix {
    support: HashMap<usize, Vec<usize>>,
    by_support: HashMap<(usize, Vec<usize>), usize>,
}

impl SimplexMatrix {
    /// Builds supports for every cell of dimension `d` or `d + k` in
    /// `boundary`, memoizing intermediate (lower-dimension) supports along
    /// the way but retaining only the two target dimensions in the result.
    pub fn build<C: Column>(boundary: &Matrix<C>, d: usize, k: usize) -> Self {
        let mut memo: HashMap<usize, Vec<usize>> = HashMap::new();
        let mut support = HashMap::new();
        let mut by_support = HashMap::new();
        let n_dimensions = boundary.view().n_dimensions();

        for &target_dim in &[d, d + k] {
            if target_dim >= n_dimensions {
                continue;
            }
            for &c in boundary.view().block(target_dim) {
                let verts = Self::support_of(c, boundary, &mut memo);
                by_support.insert((target_dim, verts.clone()), c);
                support.insert(c, verts);
            }
        }

        Self { support, by_support }
    }

    fn support_of<C: Column>(
        c: usize,
        boundary: &Matrix<C>,
        memo: &mut HashMap<usize, Vec<usize>>,
    ) -> Vec<usize> {
        if let Some(cached) = memo.get(&c) {
            return cached.clone();
        }
        let dim = boundary.dimension(c);
        let verts = if dim == 0 {
            vec![c]
        } else if dim == 1 {
            let mut v: Vec<usize> = boundary.column(c).entries().collect();
            v.sort_unstable();
            v
        } else {
            let mut acc: Vec<usize> = Vec::new();
            for r in boundary.column(c).entries() {
                acc.extend(Self::support_of(r, boundary, memo));
            }
            acc.sort_unstable();
            acc.dedup();
            acc
        };
        memo.insert(c, verts.clone());
        verts
    }

    /// The vertex support of `c`, if `c` was one of the target dimensions.
    pub fn support(&self, c: usize) -> Option<&[usize]> {
        self.support.get(&c).map(Vec::as_slice)
    }

    /// The cell of dimension `dim` whose vertex support equals `verts`
    /// (already sorted), if any.
    pub fn find(&self, dim: usize, verts: &[usize]) -> Option<usize> {
        self.by_support.get(&(dim, verts.to_vec())).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::VecColumn;

    fn triangle() -> Matrix<VecColumn> {
        // vertices 0,1,2; edges 3(01),4(02),5(12); face 6
        Matrix::new(
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
        )
    }

    #[test]
    fn edge_support_is_its_two_vertices() {
        let m = triangle();
        let s = SimplexMatrix::build(&m, 1, 1);
        assert_eq!(s.support(3), Some(&[0, 1][..]));
    }

    #[test]
    fn face_support_is_union_of_its_edges_vertices() {
        let m = triangle();
        let s = SimplexMatrix::build(&m, 1, 1);
        assert_eq!(s.support(6), Some(&[0, 1, 2][..]));
        assert_eq!(s.find(2, &[0, 1, 2]), Some(6));
    }
}
