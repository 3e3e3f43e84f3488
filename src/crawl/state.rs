// src/crawl/state.rs
// =============================================================================
// The crawl-wide collections, owned by one aggregate.
//
// CrawlState is created once per crawl and passed by &mut into the
// scheduling loop. Nothing else writes to it, so the invariants below are
// easy to keep:
// - a location enters `seen` when it is enqueued, and never leaves
// - `visited` holds every popped location exactly once, in fetch order
// - `images` and `errors` only grow
// =============================================================================

use crate::location::Location;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// One frontier entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub location: Location,
    /// Hops still allowed below this location
    pub remaining_depth: usize,
}

// A non-fatal problem, kept for the final report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEntry {
    pub context: String,
    pub cause: String,
}

impl fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.context, self.cause)
    }
}

// Append-only list of non-fatal errors
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct ErrorLog(Vec<ErrorEntry>);

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, context: impl Into<String>, cause: impl fmt::Display) {
        let entry = ErrorEntry {
            context: context.into(),
            cause: cause.to_string(),
        };
        tracing::warn!(context = %entry.context, cause = %entry.cause, "recorded error");
        self.0.push(entry);
    }

    pub fn entries(&self) -> &[ErrorEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct CrawlState {
    pub(crate) frontier: VecDeque<CrawlTask>,
    pub(crate) seen: HashSet<Location>,
    pub visited: Vec<Location>,
    pub images: BTreeSet<Location>,
    pub errors: ErrorLog,
}

impl CrawlState {
    // Starts a crawl with the seed as the only frontier entry
    pub fn seeded(seed: Location, max_depth: usize) -> Self {
        let mut state = Self::default();
        state.enqueue(seed, max_depth);
        state
    }

    // Test-and-set on `seen`; returns false if the location was already known
    pub fn enqueue(&mut self, location: Location, remaining_depth: usize) -> bool {
        if !self.seen.insert(location.clone()) {
            return false;
        }
        self.frontier.push_back(CrawlTask {
            location,
            remaining_depth,
        });
        true
    }

    pub fn has_seen(&self, location: &Location) -> bool {
        self.seen.contains(location)
    }

    // Pops the next task and marks it visited
    pub fn next_task(&mut self) -> Option<CrawlTask> {
        let task = self.frontier.pop_front()?;
        self.visited.push(task.location.clone());
        Some(task)
    }

    pub fn pending(&self) -> usize {
        self.frontier.len()
    }
}

// Shared stop switch, checked between frontier tasks and between images
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
