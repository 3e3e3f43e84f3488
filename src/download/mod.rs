// src/download/mod.rs
// =============================================================================
// Writes discovered images to the destination directory.
//
// Submodules:
// - filename: Index-prefixed, length-capped, type-correct file names
// - materialize: Copies local images, validates and saves network ones
// =============================================================================

mod filename;
mod materialize;

pub use filename::{destination_name, pad_width, MAX_BASENAME_CHARS};
pub use materialize::{DownloadOutcome, MaterializeReport, Materializer};
