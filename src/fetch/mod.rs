// src/fetch/mod.rs
// =============================================================================
// Getting bytes for a location, from disk or over HTTP.
//
// Submodules:
// - http: Client construction, error categorization, seed redirect probe
// - document: The frontier's fetcher (Html / ImageDirect / Empty)
// =============================================================================

mod document;
mod http;

pub use document::{DocumentFetcher, FetchResult};
pub use http::{build_client, build_probe_client, follow_one_redirect, FetchError};
