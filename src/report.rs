// src/report.rs
// =============================================================================
// The end result of a run: what was visited, what was found, what was saved,
// and every non-fatal error along the way.
// =============================================================================

use crate::crawl::{ErrorEntry, ErrorLog};
use crate::download::MaterializeReport;
use crate::location::Location;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CrawlReport {
    /// Seed after the redirect probe
    pub seed: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    pub visited: Vec<Location>,
    pub images: Vec<Location>,
    pub downloads: MaterializeReport,
    pub errors: ErrorLog,
    pub cancelled: bool,
}

impl CrawlReport {
    pub fn saved(&self) -> usize {
        self.downloads.saved
    }

    pub fn error_entries(&self) -> &[ErrorEntry] {
        self.errors.entries()
    }

    // True when nothing at all went wrong
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && !self.cancelled
    }
}
