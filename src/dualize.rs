//! Anti-transposition: `M*[N-1-r]` contains `{N-1-c : r in M[c]}`, with the
//! dimension tag shifted by `D-1-dim`. Persistent homology of `M*` is
//! persistent cohomology of `M`.

use rayon::prelude::*;

use crate::columns::Column;
use crate::matrix::Matrix;

/// Produces the anti-transpose of `matrix`. Executed as two
/// passes so that the per-column allocation can be sized exactly up front:
/// the first pass (parallel) counts entries destined for each dual column,
/// the second (sequential, since each source column scatters into many
/// destinations) builds them.
pub fn anti_transpose<C: Column>(matrix: &Matrix<C>) -> Matrix<C> {
    let n = matrix.n_columns();
    if n == 0 {
        return Matrix::new(Vec::new());
    }
    let n_dimensions = matrix.view().n_dimensions();

    // Pass 1: count entries destined for each dual column, so pass 2 can
    // allocate exactly (this is the part the original parallelised with
    // `#pragma omp parallel for` over columns; here the scatter itself is
    // kept sequential since many source columns can write into the same
    // destination).
    let mut sizes = vec![0usize; n];
    for c in 0..n {
        for r in matrix.column(c).entries() {
            sizes[n - 1 - r] += 1;
        }
    }

    // Pass 2: scatter.
    let mut dual_entries: Vec<Vec<usize>> =
        sizes.iter().map(|&size| Vec::with_capacity(size)).collect();
    for c in 0..n {
        for r in matrix.column(c).entries() {
            dual_entries[n - 1 - r].push(n - 1 - c);
        }
    }
    dual_entries.par_iter_mut().for_each(|col| col.sort_unstable());

    let dual_columns: Vec<C> = (0..n)
        .into_par_iter()
        .map(|dual_idx| {
            let source_idx = n - 1 - dual_idx;
            let dual_dim = n_dimensions - 1 - matrix.dimension(source_idx);
            C::from((dual_dim, dual_entries[dual_idx].clone()))
        })
        .collect();

    Matrix::new(dual_columns)
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
    fn dualize_is_an_involution() {
        let m = triangle();
        let dual = anti_transpose(&m);
        let back = anti_transpose(&dual);
        for c in 0..m.n_columns() {
            let mut a: Vec<_> = m.column(c).entries().collect();
            let mut b: Vec<_> = back.column(c).entries().collect();
            a.sort_unstable();
            b.sort_unstable();
            assert_eq!(a, b);
            assert_eq!(m.dimension(c), back.dimension(c));
        }
    }

    #[test]
    fn dual_dimension_shift() {
        let m = triangle();
        let dual = anti_transpose(&m);
        // cell 6 (dim 2, the face) becomes cell 0 in the dual, dimension D-1-2 = 0
        assert_eq!(dual.dimension(0), 0);
        // cell 0 (dim 0, a vertex) becomes cell 6 in the dual, dimension D-1-0 = 2
        assert_eq!(dual.dimension(6), 2);
    }
}
