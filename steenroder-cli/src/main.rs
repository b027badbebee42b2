//! CLI entry point for computing Steenrod square barcodes from a boundary
//! matrix.
//!
//! Grounded in `original_source/include/steenroder/args_parser.hpp` (flag
//! names/defaults) and `original_source/src/barcodes.cpp`
//! (`compute_steenrod_barcodes`, the read -> simplex -> dual-reduce ->
//! extract -> Steenrod-compute -> dualize -> write-pairs pipeline, now
//! wired through [`steenroder::run_pipeline`]).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use steenroder::io;
use steenroder::{Result, SteenroderOptions, VecColumn};

/// Computes persistent cohomology and Steenrod square barcodes for a
/// filtered cell complex described by a boundary matrix.
#[derive(Parser)]
#[command(name = "steenroder")]
#[command(about = "Compute Steenrod square barcodes from a boundary matrix", long_about = None)]
struct Cli {
    /// Path to the input boundary matrix (ASCII format).
    input: PathBuf,

    /// Prefix for output files.
    output: PathBuf,

    /// Cohomology degree d that Sq^k acts on.
    #[arg(short, long = "dim", default_value_t = 1)]
    dim: usize,

    /// The Steenrod index k.
    #[arg(short, long = "k", default_value_t = 1)]
    k: usize,

    /// Emit representative chains alongside the barcode.
    #[arg(short, long = "reps")]
    reps: bool,
}

fn run(cli: Cli) -> Result<()> {
    info!(input = %cli.input.display(), dim = cli.dim, k = cli.k, "loading boundary matrix");
    let boundary = io::load_ascii::<VecColumn>(&cli.input)?;
    info!(n_cells = boundary.n_columns(), "boundary matrix loaded");

    let options = SteenroderOptions {
        degree: cli.dim,
        k: cli.k,
        keep_representatives: cli.reps,
        ..SteenroderOptions::default()
    };

    // `dual_bars` holds the persistent cohomology pairs as extracted, still
    // in the anti-transpose's dual cell indexing (see `run_pipeline`'s doc
    // comment): only the Steenrod bars get dualized back to the original
    // filtration's indexing, matching the original driver.
    let (dual_bars, steenrod_bars) = steenroder::run_pipeline(&boundary, &options);
    info!(
        n_cohomology_bars = dual_bars.len(),
        n_steenrod_bars = steenrod_bars.len(),
        "pipeline complete"
    );

    let dual_path = format!("{}_dual_pairs.dat", cli.output.display());
    let steenrod_path = format!("{}_steenrod_pairs.dat", cli.output.display());
    io::save_bars_ascii(&dual_bars, &dual_path)?;
    io::save_bars_ascii(&steenrod_bars, &steenrod_path)?;

    if cli.reps {
        io::save_ascii(&boundary, "boundary", &cli.output)?;
        io::save_ascii(dual_bars.representatives(), "dual_reps", &cli.output)?;
        io::save_ascii(steenrod_bars.representatives(), "steenrod_reps", &cli.output)?;
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "steenroder failed");
            eprintln!("steenroder: {err}");
            ExitCode::FAILURE
        }
    }
}
