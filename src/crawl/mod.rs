// src/crawl/mod.rs
// =============================================================================
// This module handles the traversal itself.
//
// Features:
// - Breadth-first crawling starting from a URL or a local HTML file
// - Optional restriction to the seed's host (or directory)
// - Depth limit counted in hops from the seed
// - Cancellation between frontier tasks
// =============================================================================

mod queue;
mod scope;
mod state;

pub use queue::{CrawlOutcome, Crawler};
pub use scope::Scope;
pub use state::{CancelFlag, CrawlState, CrawlTask, ErrorEntry, ErrorLog};
