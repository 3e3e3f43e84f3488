// src/crawl/queue.rs
// =============================================================================
// Breadth-first crawl over a FIFO frontier.
//
// How it works:
// 1. Resolve the seed through at most one redirect and derive the scope
// 2. Put (seed, max_depth) in the queue and mark it seen
// 3. Pop a task, mark it visited, fetch it
// 4. HTML pages are scanned against the URL they were served from (after
//    redirects): images are collected, links with depth left and inside the
//    scope are enqueued once
// 5. Repeat until the queue is empty (or the crawl is cancelled)
//
// A failing page is recorded in the error log and the loop moves on, so a
// crawl always returns everything it managed to find.
// =============================================================================

use super::scope::Scope;
use super::state::{CancelFlag, CrawlState};
use crate::fetch::{follow_one_redirect, DocumentFetcher, FetchResult};
use crate::location::Location;
use crate::scan;
use reqwest::Client;
use tracing::{debug, info};

// What a finished (or cancelled) crawl hands back
#[derive(Debug)]
pub struct CrawlOutcome {
    /// The seed actually crawled (after the redirect probe)
    pub seed: Location,
    pub scope: Option<Scope>,
    pub state: CrawlState,
    pub cancelled: bool,
}

#[derive(Debug, Clone)]
pub struct Crawler {
    fetcher: DocumentFetcher,
    probe: Client,
    scoped: bool,
    cancel: CancelFlag,
}

impl Crawler {
    // Parameters:
    //   client: client used for page fetches (follows redirects)
    //   probe: client used once on the seed (does not follow redirects)
    //   scoped: restrict expansion to the seed's host/directory
    pub fn new(client: Client, probe: Client, scoped: bool, cancel: CancelFlag) -> Self {
        Self {
            fetcher: DocumentFetcher::new(client),
            probe,
            scoped,
            cancel,
        }
    }

    pub async fn crawl(&self, seed: Location, max_depth: usize) -> CrawlOutcome {
        let seed = match seed {
            Location::Url(url) => Location::Url(follow_one_redirect(&self.probe, &url).await),
            file => file,
        };
        let scope = Scope::of(&seed);

        match (&scope, self.scoped) {
            (Some(scope), true) => info!(%seed, max_depth, %scope, "starting crawl"),
            _ => info!(%seed, max_depth, "starting crawl"),
        }

        let mut state = CrawlState::seeded(seed.clone(), max_depth);
        let cancelled = self.drive(&mut state, scope.as_ref()).await;

        info!(
            visited = state.visited.len(),
            images = state.images.len(),
            errors = state.errors.len(),
            cancelled,
            "crawl finished"
        );

        CrawlOutcome {
            seed,
            scope,
            state,
            cancelled,
        }
    }

    // Runs the frontier loop; returns true if it stopped because of a cancel
    async fn drive(&self, state: &mut CrawlState, scope: Option<&Scope>) -> bool {
        loop {
            if self.cancel.is_cancelled() {
                info!(pending = state.pending(), "crawl cancelled");
                return true;
            }

            let Some(task) = state.next_task() else {
                return false;
            };

            debug!(depth = task.remaining_depth, location = %task.location, "crawling");

            let (body, base) = match self.fetcher.fetch(&task.location).await {
                Ok(FetchResult::Html { body, base }) => (body, base),
                Ok(FetchResult::ImageDirect(image)) => {
                    state.images.insert(image);
                    continue;
                }
                Ok(FetchResult::Empty) => continue,
                Err(e) => {
                    state.errors.record(format!("Error on {}", task.location), e);
                    continue;
                }
            };

            // A redirect may have left the scope; such a page is not scanned
            if self.scoped && !scope.is_some_and(|scope| scope.contains(&base)) {
                debug!(location = %task.location, served_from = %base, "redirected outside scope");
                continue;
            }

            let outcome = scan::scan(&body, &base);

            for (raw, e) in outcome.rejected {
                if e.is_expected() {
                    debug!(reference = %raw, error = %e, "skipping reference");
                } else {
                    state.errors.record(
                        format!("Unresolvable reference on {}", task.location),
                        format!("'{}': {}", raw, e),
                    );
                }
            }

            state.images.extend(outcome.images);

            // Depth is checked before it is decremented
            let Some(child_depth) = task.remaining_depth.checked_sub(1) else {
                continue;
            };

            for child in outcome.links {
                if state.has_seen(&child) {
                    continue;
                }
                if self.scoped && !scope.is_some_and(|scope| scope.contains(&child)) {
                    debug!(location = %child, "outside scope");
                    continue;
                }
                state.enqueue(child, child_depth);
            }
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why VecDeque and not Vec?
//    - Breadth-first needs FIFO: push_back() to add, pop_front() to take
//    - Vec::remove(0) would shift every element on each pop
//
// 2. Why mark locations "seen" at enqueue time?
//    - Two pages on the same level often link to the same child
//    - Checking at fetch time would queue that child twice
//
// 3. What is `let ... else`?
//    - `let Some(x) = expr else { continue; };` binds x or leaves the branch
//    - checked_sub(1) returns None at depth 0, so a page at the last level
//      is scanned for images but its links are never queued
//
// 4. Why does fetch() never stop the loop?
//    - Its errors are values (Result), recorded in state.errors
//    - The next frontier entry is processed regardless
// -----------------------------------------------------------------------------
