//! Sq^k evaluation on cohomology representatives, and the death computation
//! for the resulting Steenrod bars.

use tracing::{debug, instrument};

use crate::bars::Bars;
use crate::columns::Column;
use crate::matrix::{Matrix, View};
use crate::simplex::SimplexMatrix;

/// One Steenrod bar, indexed positionally (not by cell id, since Sq^k
/// representatives do not correspond 1:1 with cells): the cohomology class it
/// came from, its representative chain in dimension `d+k`, and its death once
/// [`compute_deaths`] has run.
#[derive(Debug, Clone)]
pub struct SteenrodBar<C: Column> {
    pub birth: usize,
    pub death: Option<usize>,
    pub representative: C,
}

/// Tags which store a reduction owner was read from, since the mixed
/// reduction of §4.6.3 couples cohomology columns (fixed, read-only) with
/// Steenrod columns (the ones actually being reduced). Replaces the
/// inheritance-based dispatch between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Cohomology(usize),
    Steenrod(usize),
}

/// Enumerates unordered pairs of cells in `representative` and toggles in the
/// dual index of any dimension-`d+k` cell whose vertex support is the purely
/// admissible union of an interleaved pair.
///
/// `representative` and the returned column use dualized indexing (cell `c`
/// denotes the true cell `n_cells - 1 - c`), matching the indexing convention
/// [`crate::dualize::anti_transpose`] and [`SimplexMatrix`] share.
pub fn steenrod_square<C: Column>(
    representative: &C,
    simplex: &SimplexMatrix,
    d: usize,
    k: usize,
    n_cells: usize,
) -> C {
    let mut cells: Vec<usize> = representative.entries().collect();
    cells.sort_unstable();

    let mut accumulator = C::new_with_dimension(d + k);

    for i in 0..cells.len() {
        for j in (i + 1)..cells.len() {
            let a_tilde = n_cells - 1 - cells[i];
            let b_tilde = n_cells - 1 - cells[j];
            let (Some(a), Some(b)) = (simplex.support(a_tilde), simplex.support(b_tilde)) else {
                continue;
            };

            let u = sorted_union(a, b);
            if u.len() != d + k + 1 {
                continue;
            }
            let Some(s) = simplex.find(d + k, &u) else {
                continue;
            };

            let a_bar = sorted_difference(b, a);
            let b_bar = sorted_difference(a, b);
            if a_bar.is_empty() {
                continue;
            }
            let v = sorted_union(&a_bar, &b_bar);

            let rank = |x: usize, set: &[usize]| set.binary_search(&x).unwrap();
            let pos = |x: usize| (rank(x, &u) + rank(x, &v)) % 2;

            let pos_a0 = pos(a_bar[0]);
            let pos_b0 = pos(b_bar[0]);
            if pos_a0 == pos_b0 {
                continue;
            }
            let pure = a_bar
                .iter()
                .zip(b_bar.iter())
                .skip(1)
                .all(|(&x, &y)| pos(x) == pos_a0 && pos(y) == pos_b0);

            if pure {
                accumulator.add_entry(n_cells - 1 - s);
            }
        }
    }

    accumulator
}

fn sorted_union(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut v: Vec<usize> = a.iter().chain(b.iter()).copied().collect();
    v.sort_unstable();
    v.dedup();
    v
}

fn sorted_difference(a: &[usize], b: &[usize]) -> Vec<usize> {
    a.iter().copied().filter(|x| !b.contains(x)).collect()
}

/// Builds the (death-less) Steenrod bars from every cohomology bar of
/// dimension `d`: one bar
/// per non-empty Sq^k image, birth inherited from the cohomology bar.
///
/// `cohomology_bars`'s view partitions cells by the *dual* dimension tag
/// `extract_bars` assigned them (`n_dimensions - 1 - original_dim`, per
/// `anti_transpose`'s shift), so selecting the original degree-`d` classes
/// means indexing the view's block `n_dimensions - 1 - d`, not block `d`.
#[instrument(skip(cohomology_bars, simplex))]
pub fn build_steenrod_bars<C: Column>(
    cohomology_bars: &Bars<C>,
    simplex: &SimplexMatrix,
    d: usize,
    k: usize,
) -> Vec<SteenrodBar<C>> {
    let n_cells = cohomology_bars.len();
    let mut bars = Vec::new();
    let n_dimensions = cohomology_bars.view().n_dimensions();
    if d >= n_dimensions {
        return bars;
    }
    let dual_d = n_dimensions - 1 - d;
    for &slot in cohomology_bars.view().block(dual_d) {
        let birth = match cohomology_bars.birth(slot) {
            Some(b) => b,
            None => continue,
        };
        let representative = steenrod_square(cohomology_bars.representative(slot), simplex, d, k, n_cells);
        if representative.pivot().is_some() {
            bars.push(SteenrodBar {
                birth,
                death: None,
                representative,
            });
        }
    }
    debug!(n_bars = bars.len(), "built Steenrod bars");
    bars
}

/// Computes the death of every Steenrod bar by reducing it against the pool
/// of finite cohomology representatives of dimension `d+k`, unioned with
/// already-reduced Steenrod bars, sorted by descending pivot. Steenrod
/// columns are processed in ascending birth order; deaths
/// and born-dead classification are recorded in place.
///
/// As in [`build_steenrod_bars`], `d+k` is an *original* dimension and must
/// be converted to `cohomology_bars`'s dual-view block index before it is
/// used to select columns.
#[instrument(skip(cohomology_bars, steenrod_bars))]
pub fn compute_deaths<C: Column>(
    cohomology_bars: &Bars<C>,
    steenrod_bars: &mut [SteenrodBar<C>],
    d: usize,
    k: usize,
    keep_representatives: bool,
) {
    let n_cells = cohomology_bars.len();
    let target_dim = d + k;
    let n_dimensions = cohomology_bars.view().n_dimensions();

    let mut owner: Vec<Option<Origin>> = vec![None; n_cells];
    if target_dim < n_dimensions {
        let dual_target = n_dimensions - 1 - target_dim;
        for &slot in cohomology_bars.view().block(dual_target) {
            if cohomology_bars.death(slot).is_none() {
                continue;
            }
            if let Some(p) = cohomology_bars.representative(slot).pivot() {
                owner[p] = Some(Origin::Cohomology(slot));
            }
        }
    }

    let mut order: Vec<usize> = (0..steenrod_bars.len()).collect();
    order.sort_by_key(|&i| steenrod_bars[i].birth);

    for t_idx in order {
        let mut max_added: Option<usize> = None;
        loop {
            let Some(p) = steenrod_bars[t_idx].representative.pivot() else {
                break;
            };
            match owner[p] {
                None => break,
                Some(Origin::Steenrod(j)) if j == t_idx => break,
                Some(Origin::Cohomology(slot)) => {
                    let src_birth = cohomology_bars.birth(slot).unwrap();
                    steenrod_bars[t_idx]
                        .representative
                        .add_col(cohomology_bars.representative(slot));
                    max_added = Some(max_added.map_or(src_birth, |m| m.max(src_birth)));
                }
                Some(Origin::Steenrod(j)) => {
                    let src_birth = steenrod_bars[j].birth;
                    let src_col = steenrod_bars[j].representative.clone();
                    steenrod_bars[t_idx].representative.add_col(&src_col);
                    max_added = Some(max_added.map_or(src_birth, |m| m.max(src_birth)));
                }
            }
        }

        if let Some(p) = steenrod_bars[t_idx].representative.pivot() {
            if owner[p].is_none() {
                owner[p] = Some(Origin::Steenrod(t_idx));
            }
            steenrod_bars[t_idx].death = None;
        } else {
            let birth = steenrod_bars[t_idx].birth;
            let death = max_added.unwrap_or(birth);
            steenrod_bars[t_idx].death = Some(death);
            if death == birth && !keep_representatives {
                steenrod_bars[t_idx].representative.clear_entries();
            }
        }
    }
}

/// Runs the full Steenrod engine: builds bars from every degree-`d`
/// cohomology class, computes their deaths, and packages the result as a
/// [`Bars`] (all slots tagged dimension `d+k`) ready for I/O.
pub fn compute<C: Column>(
    cohomology_bars: &Bars<C>,
    simplex: &SimplexMatrix,
    d: usize,
    k: usize,
    keep_representatives: bool,
) -> Bars<C> {
    let mut raw = build_steenrod_bars(cohomology_bars, simplex, d, k);
    compute_deaths(cohomology_bars, &mut raw, d, k, keep_representatives);

    let n = raw.len();
    let mut birth = Vec::with_capacity(n);
    let mut death = Vec::with_capacity(n);
    let mut columns = Vec::with_capacity(n);
    for bar in raw {
        birth.push(Some(bar.birth));
        death.push(bar.death);
        columns.push(bar.representative);
    }
    let mut representatives = Matrix::new(columns);
    representatives.set_view(View::from_dims(d + k + 1, (0..n).map(|i| (d + k, i))));

    Bars::from_parts(birth, death, representatives)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::VecColumn;
    use crate::dualize::anti_transpose;
    use crate::reduce::reduce_twist;

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

    fn identity_witness(n: usize, dims: &[usize]) -> Matrix<VecColumn> {
        Matrix::new((0..n).map(|i| VecColumn::from((dims[i], vec![i]))).collect())
    }

    #[test]
    fn sq_on_empty_cohomology_is_empty() {
        let m = triangle();
        let simplex = SimplexMatrix::build(&m, 1, 1);
        let empty = VecColumn::new_with_dimension(1);
        let out = steenrod_square(&empty, &simplex, 1, 1, 7);
        assert!(out.is_cycle());
    }

    #[test]
    fn triangle_sq1_h1_class_is_born_dead() {
        let m = triangle();
        let dims: Vec<usize> = (0..7).map(|c| m.dimension(c)).collect();
        let dual = anti_transpose(&m);
        let dual_dims: Vec<usize> = (0..7).map(|c| dual.dimension(c)).collect();
        let mut reduced = dual.clone();
        let mut witness = identity_witness(7, &dual_dims);
        reduce_twist(&mut reduced, &mut witness);
        let cohomology_bars = crate::bars::extract_bars(reduced, witness);

        // Build simplex support over the ORIGINAL (non-dual) boundary matrix;
        // Sq^k operates on true cell indices reached via n_cells-1-c.
        let simplex = SimplexMatrix::build(&m, 1, 1);
        let _ = dims; // kept for readability of the fixture

        let steenrod_bars = compute(&cohomology_bars, &simplex, 1, 1, false);
        // All representatives, if any, must live in dimension d+k = 2.
        for slot in 0..steenrod_bars.len() {
            if let Some(birth) = steenrod_bars.birth(slot) {
                assert!(steenrod_bars.death(slot).is_some() || steenrod_bars.is_infinite(slot));
                let _ = birth;
            }
        }
    }
}
