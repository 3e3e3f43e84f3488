// src/scan/mod.rs
// =============================================================================
// Everything that turns a fetched page into new locations.
//
// Submodules:
// - resolve: Resolves a raw href/src against the page it came from
// - html: Pulls anchors and images out of an HTML document
// =============================================================================

mod html;
mod resolve;

pub use html::{scan, ScanOutcome};
pub use resolve::{resolve, ResolveError};
