//! Error kinds for the steenroder pipeline.
//!
//! Mirrors the "Error kinds" of the system's error-handling design: input-open
//! failures and malformed input are reported to the caller; an inconsistent
//! filtration is a violated precondition the loader can detect; a requested
//! dimension out of range is *not* an error (callers get an empty [`crate::bars::Bars`]).

use std::path::PathBuf;

/// Errors surfaced while loading, saving or validating boundary matrices and bars.
#[derive(Debug, thiserror::Error)]
pub enum SteenroderError {
    /// The input or output file could not be opened.
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line of ASCII input, or a binary record, did not parse as expected.
    #[error("malformed input at line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    /// `boundary(c)` contained an index `>= c`, violating the filtration order.
    #[error("cell {cell} has a boundary entry {offending_row} >= {cell}, violating filtration order")]
    InconsistentFiltration { cell: usize, offending_row: usize },
}

pub type Result<T> = std::result::Result<T, SteenroderError>;
