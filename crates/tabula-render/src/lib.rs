//! Renderer boundary for Tabula grids.
//!
//! A renderer consumes a fully resolved [`Matrix`] and a writable byte sink.
//! It owns header-row emission, per-cell value/formula writing through its
//! native API, and format application via a [`FormatApplier`] for its format
//! kind. The writers in this crate target plain-text grid formats; writers
//! wrapping third-party spreadsheet libraries implement the same two
//! contracts from their own crates.

mod applier;
mod csv_writer;
mod markdown;

use std::io::Write;

use tabula_model::{FormatError, Matrix};
use thiserror::Error;

pub use applier::FormatApplier;
pub use csv_writer::CsvRenderer;
pub use markdown::{
    BasicEmphasisApplier, Emphasis, MarkdownFormat, MarkdownFormatApplier, MarkdownRenderer,
    MdCell,
};

/// Errors raised while serializing a grid.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// A pluggable grid writer.
pub trait MatrixRenderer {
    /// Serialize the grid into `out`.
    fn generate(&self, matrix: &Matrix, out: &mut dyn Write) -> Result<(), RenderError>;
}
