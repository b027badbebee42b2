//! Persistence extraction: turns a reduced matrix plus its triangular witness
//! into birth/death labelled bars with persistent representatives.
//!
//! Unifies what the original kept as separate `FiniteBars`/`InfiniteBars`
//! types into one `Bars<C>`, keyed
//! by cell index throughout.

use crate::columns::Column;
use crate::matrix::{Matrix, View};

/// Birth/death labelled bars over cell indices, with the persistent
/// representative chain recorded per bar.
///
/// A finite bar is stored at the slot of its *death* cell (`birth[c] =
/// Some(b)`, `death[c] = Some(c)`); an infinite bar is stored at the slot of
/// its own (birth) cell (`birth[c] = Some(c)`, `death[c] = None`). Slots with
/// no bar have `birth[c] = None`.
#[derive(Debug, Clone)]
pub struct Bars<C: Column> {
    birth: Vec<Option<usize>>,
    death: Vec<Option<usize>>,
    representatives: Matrix<C>,
}

impl<C: Column> Bars<C> {
    /// Builds a `Bars` directly from parallel birth/death/representative
    /// data, e.g. the Steenrod bars assembled by [`crate::steenrod`], which
    /// do not go through [`extract_bars`].
    pub fn from_parts(
        birth: Vec<Option<usize>>,
        death: Vec<Option<usize>>,
        representatives: Matrix<C>,
    ) -> Self {
        Self {
            birth,
            death,
            representatives,
        }
    }

    pub fn len(&self) -> usize {
        self.birth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.birth.iter().all(Option::is_none)
    }

    pub fn birth(&self, slot: usize) -> Option<usize> {
        self.birth[slot]
    }

    pub fn death(&self, slot: usize) -> Option<usize> {
        self.death[slot]
    }

    /// Whether `slot` holds a bar at all (as opposed to an empty, unused
    /// position).
    pub fn has_bar(&self, slot: usize) -> bool {
        self.birth[slot].is_some()
    }

    /// Whether the bar at `slot`, if any, is infinite (no death).
    pub fn is_infinite(&self, slot: usize) -> bool {
        self.birth[slot].is_some() && self.death[slot].is_none()
    }

    pub fn representative(&self, slot: usize) -> &C {
        self.representatives.column(slot)
    }

    pub fn representatives(&self) -> &Matrix<C> {
        &self.representatives
    }

    pub fn view(&self) -> &View {
        self.representatives.view()
    }

    /// Clears the representative stored at `slot`, e.g. when a Steenrod bar
    /// is classified born-dead.
    pub fn clear_representative(&mut self, slot: usize) {
        self.representatives.column_mut(slot).clear_entries();
    }

    pub fn set_death(&mut self, slot: usize, death: Option<usize>) {
        self.death[slot] = death;
    }

    /// Remaps birth/death labels under `c ↦ n_cells - 1 - c`, leaving slot
    /// positions, dimensions and representatives untouched. For an infinite
    /// bar only the birth is remapped; for a finite bar birth and death are
    /// remapped *and swapped* (`new_birth = n_cells-1-old_death`, `new_death
    /// = n_cells-1-old_birth`), matching the one live call to `Bars::dualize`
    /// in the original driver (see DESIGN.md, OQ1) — it never consults the
    /// dimension of a bar.
    pub fn dualize(&self, n_cells: usize) -> Self {
        let remap = |x: usize| n_cells - 1 - x;
        let n = self.birth.len();
        let mut birth = vec![None; n];
        let mut death = vec![None; n];
        for slot in 0..n {
            match (self.birth[slot], self.death[slot]) {
                (Some(b), None) => birth[slot] = Some(remap(b)),
                (Some(b), Some(d)) => {
                    birth[slot] = Some(remap(d));
                    death[slot] = Some(remap(b));
                }
                (None, _) => {}
            }
        }
        Self {
            birth,
            death,
            representatives: self.representatives.clone(),
        }
    }
}

/// Builds a [`Bars`] from a matrix already reduced by [`crate::reduce`] and
/// the triangular witness accumulated alongside it.
///
/// `reduced` and `witness` must have the same length and have been reduced in
/// lock-step (every `add_into` applied to `reduced` was mirrored on
/// `witness`).
pub fn extract_bars<C: Column>(reduced: Matrix<C>, witness: Matrix<C>) -> Bars<C> {
    let n = reduced.n_columns();
    assert_eq!(n, witness.n_columns());

    let own_dim: Vec<usize> = (0..n).map(|c| reduced.dimension(c)).collect();

    // Step 1: find unpaired (infinite) cells.
    let mut infinite = vec![true; n];
    for c in 0..n {
        if let Some(b) = reduced.column(c).pivot() {
            infinite[b] = false;
            infinite[c] = false;
        }
    }

    let mut reduced_cols = reduced.into_columns();
    let mut witness_cols = witness.into_columns();

    let mut birth = vec![None; n];
    let mut death = vec![None; n];
    let mut representative_cols: Vec<C> = Vec::with_capacity(n);

    for c in 0..n {
        if infinite[c] {
            // Step 2: an infinite bar's representative is the cycle recorded
            // in the witness, since the reduced column at an unpaired cell
            // is itself zero.
            birth[c] = Some(c);
            representative_cols.push(std::mem::replace(
                &mut witness_cols[c],
                C::new_with_dimension(own_dim[c]),
            ));
        } else if let Some(b) = reduced_cols[c].pivot() {
            // Step 3: a finite pair's representative is the just-reduced
            // column itself, stored at the death slot; its dimension is
            // taken from the birth cell, not the death cell.
            birth[c] = Some(b);
            death[c] = Some(c);
            representative_cols.push(std::mem::replace(
                &mut reduced_cols[c],
                C::new_with_dimension(own_dim[c]),
            ));
        } else {
            // A cell that is some other column's pivot: no bar is recorded
            // here, the pair lives at its death slot instead.
            representative_cols.push(C::new_with_dimension(own_dim[c]));
        }
    }

    let n_dimensions = own_dim.iter().copied().max().map_or(0, |d| d + 1);
    let view_entries = (0..n).filter_map(|c| match (birth[c], death[c]) {
        (Some(_), None) => Some((own_dim[c], c)),
        (Some(b), Some(_)) => Some((own_dim[b], c)),
        (None, _) => None,
    });
    let mut representatives = Matrix::new(representative_cols);
    representatives.set_view(View::from_dims(n_dimensions, view_entries));

    Bars {
        birth,
        death,
        representatives,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::VecColumn;
    use crate::reduce::reduce_twist;

    fn identity_witness(n: usize, dims: &[usize]) -> Matrix<VecColumn> {
        Matrix::new(
            (0..n)
                .map(|i| VecColumn::from((dims[i], vec![i])))
                .collect(),
        )
    }

    #[test]
    fn triangle_has_one_finite_pair_per_dimension_and_no_infinite_bars() {
        // vertices 0,1,2; edges 3(01),4(02),5(12); face 6
        let dims = vec![0, 0, 0, 1, 1, 1, 2];
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
        let mut witness = identity_witness(7, &dims);
        reduce_twist(&mut m, &mut witness);
        let bars = extract_bars(m, witness);

        let finite: Vec<_> = (0..7).filter(|&c| bars.death(c).is_some()).collect();
        let infinite: Vec<_> = (0..7).filter(|&c| bars.is_infinite(c)).collect();
        assert_eq!(finite.len(), 3);
        assert_eq!(infinite.len(), 1, "one connected component survives");
    }

    #[test]
    fn dualize_remaps_birth_death_only() {
        let dims = vec![0, 0];
        let mut m = Matrix::new(
            vec![(0, vec![]), (0, vec![0usize])]
                .into_iter()
                .map(VecColumn::from)
                .collect(),
        );
        let mut witness = identity_witness(2, &dims);
        reduce_twist(&mut m, &mut witness);
        let bars = extract_bars(m, witness);
        let dual = bars.dualize(2);
        // slot 1 is a finite pair (birth=0, death=1): dualize swaps and remaps.
        assert_eq!(dual.birth(1), bars.death(1).map(|d| 2 - 1 - d));
        assert_eq!(dual.death(1), bars.birth(1).map(|b| 2 - 1 - b));
    }
}
