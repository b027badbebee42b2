//! # steenroder
//!
//! Computes persistent (co)homology and Steenrod square barcodes for a
//! finite filtered cell complex, over F₂.
//!
//! Given a boundary matrix (one sparse mod-2 column per cell, already in
//! filtration order, tagged with a dimension) this crate:
//!
//! - reduces it to extract ordinary persistence bars ([`bars`]);
//! - dualizes it to compute persistent cohomology instead
//!   ([`dualize::anti_transpose`]);
//! - builds the vertex-support columns needed to evaluate a Steenrod square
//!   ([`simplex`]);
//! - evaluates `Sq^k` on every degree-`d` cohomology representative and
//!   computes the death of the resulting classes ([`steenrod`]).
//!
//! The primary entry point is [`run_pipeline`], which wires all of the above
//! together the way `steenroder-cli` does. For finer-grained control, reach
//! for [`reduce::reduce_twist`] / [`bars::extract_bars`] directly.
//! [`VecColumn`] is the column representation to reach for first;
//! [`BitTreeColumn`] is a drop-in alternative tuned for pivot-heavy
//! workloads.

pub mod bars;
pub mod columns;
pub mod dualize;
pub mod error;
pub mod io;
pub mod matrix;
pub mod options;
pub mod parallel;
pub mod reduce;
#[cfg(feature = "serde")]
pub mod serde_format;
pub mod simplex;
pub mod steenrod;

pub use bars::{extract_bars, Bars};
pub use columns::{BitTreeColumn, Column, VecColumn};
pub use dualize::anti_transpose;
pub use error::{Result, SteenroderError};
pub use matrix::{Matrix, View};
pub use options::SteenroderOptions;
pub use parallel::reduce_parallel;
pub use reduce::{reduce_standard, reduce_twist};
#[cfg(feature = "serde")]
pub use serde_format::BarsFileFormat;
pub use simplex::SimplexMatrix;
pub use steenrod::{steenrod_square, SteenrodBar};

/// Runs the full pipeline: reduce the boundary matrix's anti-transpose to
/// extract cohomology bars, build the simplex matrix, evaluate `Sq^k` and
/// compute Steenrod deaths, then dualize the Steenrod bars back into the
/// original filtration's cell indexing.
///
/// Only the Steenrod bars are dualized, matching
/// `original_source/src/barcodes.cpp::compute_steenrod_barcodes`, which
/// comments out the only two calls that would have dualized the cohomology
/// bars (`dual_finite_bars_matrix`/`dual_infinite_bars_matrix`) and calls
/// `dualize()` only on `steenrod_bars_matrix`. `cohomology_bars` is returned
/// as extracted, still in the anti-transpose's dual cell indexing: since
/// [`Bars::dualize`] remaps `birth`/`death` but never touches
/// `representatives`, dualizing it here would leave birth/death in original
/// indices while every representative's entries stayed dual-indexed, an
/// internally inconsistent object.
///
/// Returns `(cohomology_bars, steenrod_bars)`. Grounded in
/// `original_source/src/barcodes.cpp`'s `compute_steenrod_barcodes`.
pub fn run_pipeline<C: Column + 'static>(
    boundary: &Matrix<C>,
    options: &SteenroderOptions,
) -> (Bars<C>, Bars<C>) {
    let n_cells = boundary.n_columns();

    let simplex = SimplexMatrix::build(boundary, options.degree, options.k);

    let mut reduced = dualize::anti_transpose(boundary);
    let dims: Vec<usize> = (0..n_cells).map(|c| reduced.dimension(c)).collect();
    let mut witness = Matrix::new(
        (0..n_cells)
            .map(|c| C::from((dims[c], vec![c])))
            .collect(),
    );

    if options.parallel {
        parallel::reduce_parallel(&mut reduced, &mut witness, options);
    } else if options.clearing {
        reduce::reduce_twist(&mut reduced, &mut witness);
    } else {
        reduce::reduce_standard(&mut reduced, &mut witness);
    }

    let cohomology_bars = bars::extract_bars(reduced, witness);
    let steenrod_bars = steenrod::compute(
        &cohomology_bars,
        &simplex,
        options.degree,
        options.k,
        options.keep_representatives,
    );

    (cohomology_bars, steenrod_bars.dualize(n_cells))
}
