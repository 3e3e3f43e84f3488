// src/scan/resolve.rs
// =============================================================================
// Resolves references found in a document against the document's location.
//
// A reference can turn into:
// - a local file, when the base document is itself a local file and the
//   reference, taken relative to that document, points at an existing file
// - an absolute URL, either because the reference already is one or because
//   it is joined with a network base ("/docs", "../img/cat.png", "?page=2")
//
// Fragments ("#section") are stripped; query strings are kept. That way
// "page.html#top" and "page.html" are the same Location for deduplication.
// =============================================================================

use crate::location::Location;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("malformed reference: {0}")]
    Malformed(#[from] url::ParseError),

    #[error("unsupported scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("relative reference with no network base")]
    NoBase,
}

impl ResolveError {
    // mailto:, javascript: and friends are expected on real pages; they are
    // dropped quietly instead of filling the error log
    pub fn is_expected(&self) -> bool {
        matches!(self, ResolveError::UnsupportedScheme(_))
    }
}

pub fn resolve(reference: &str, base: &Location) -> Result<Location, ResolveError> {
    let reference = reference.trim();

    if let Location::File(base_path) = base {
        if let Some(found) = local_file(reference, base_path) {
            return Ok(Location::File(found));
        }
    }

    match Url::parse(reference) {
        Ok(url) => network(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => match base {
            Location::Url(base_url) => network(base_url.join(reference)?),
            Location::File(_) => Err(ResolveError::NoBase),
        },
        Err(e) => Err(ResolveError::Malformed(e)),
    }
}

// Resolves the reference against the base document's directory
//
// The base path is turned into a file:// URL and the reference joined onto
// it, which strips "?query" and "#fragment", percent-decodes ("my%20cat.jpg")
// and handles "../". Only existing files count.
fn local_file(reference: &str, base_path: &Path) -> Option<PathBuf> {
    if reference.is_empty() {
        return None;
    }
    let base = Url::from_file_path(base_path).ok()?;
    let mut joined = base.join(reference).ok()?;
    // Anything with another scheme is not a path
    if joined.scheme() != "file" {
        return None;
    }
    joined.set_query(None);
    joined.set_fragment(None);

    let candidate = joined.to_file_path().ok()?;
    if !candidate.is_file() {
        return None;
    }
    // Canonical absolute paths keep directory-based scoping honest
    Some(std::fs::canonicalize(&candidate).unwrap_or(candidate))
}

fn network(mut url: Url) -> Result<Location, ResolveError> {
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(ResolveError::UnsupportedScheme(other.to_string())),
    }
    if !url.has_host() {
        return Err(ResolveError::NoBase);
    }
    url.set_fragment(None);
    Ok(Location::Url(url))
}
