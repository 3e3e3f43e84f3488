// src/scan/html.rs
// =============================================================================
// This module extracts links and image sources from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Never fails on broken markup; it recovers like a browser does
//
// Every raw reference goes through the resolver. References that cannot be
// resolved are handed back to the caller so it can decide what to log.
// =============================================================================

use super::resolve::{resolve, ResolveError};
use crate::location::Location;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use std::sync::OnceLock;

// Result of scanning one page
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Resolved anchor targets
    pub links: BTreeSet<Location>,
    /// Resolved image sources
    pub images: BTreeSet<Location>,
    /// Raw references that could not be resolved
    pub rejected: Vec<(String, ResolveError)>,
}

fn anchor_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("a[href]").expect("constant selector is valid"))
}

fn image_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("img[src]").expect("constant selector is valid"))
}

// Scans an HTML document
//
// Parameters:
//   html: raw bytes of the page (decoded lossily as UTF-8)
//   base: the location the page was fetched from
//
// Example:
//   html = "<a href='/docs'>Docs</a><img src='cat.png'>"
//   base = "https://example.com/"
//   links = {"https://example.com/docs"}, images = {"https://example.com/cat.png"}
pub fn scan(html: &[u8], base: &Location) -> ScanOutcome {
    let text = String::from_utf8_lossy(html);
    let document = Html::parse_document(&text);

    let hrefs = collect_attr(&document, anchor_selector(), "href");
    let srcs = collect_attr(&document, image_selector(), "src");

    let mut outcome = ScanOutcome::default();
    for href in hrefs {
        match resolve(&href, base) {
            Ok(loc) => {
                outcome.links.insert(loc);
            }
            Err(e) => outcome.rejected.push((href, e)),
        }
    }
    for src in srcs {
        match resolve(&src, base) {
            Ok(loc) => {
                outcome.images.insert(loc);
            }
            Err(e) => outcome.rejected.push((src, e)),
        }
    }
    outcome
}

// Non-empty attribute values, deduplicated before resolution
fn collect_attr(document: &Html, selector: &Selector, attr: &str) -> BTreeSet<String> {
    document
        .select(selector)
        .filter_map(|element| element.value().attr(attr))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}
