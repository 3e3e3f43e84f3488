// src/fetch/http.rs
// =============================================================================
// HTTP plumbing shared by the crawler and the image downloader.
//
// Key functionality:
// - Builds the reqwest clients (one that follows redirects, one that doesn't)
// - Turns reqwest failures into readable FetchError values
// - Resolves the seed through at most one redirect before scoping
//
// Every request carries a timeout so one unresponsive host cannot stall
// the whole crawl.
// =============================================================================

use reqwest::{Client, StatusCode};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

const USER_AGENT: &str = concat!("image-spider/", env!("CARGO_PKG_VERSION"));

// Why fetching one location failed
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Server answered with a non-2xx status
    #[error("HTTP {}", .0.as_u16())]
    Status(StatusCode),

    #[error("request timed out")]
    Timeout,

    #[error("too many redirects")]
    TooManyRedirects,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),
}

// Categorizes reqwest failures the same way for pages and images
impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout
        } else if error.is_redirect() {
            FetchError::TooManyRedirects
        } else if error.is_connect() {
            FetchError::Connect(root_cause(&error))
        } else {
            FetchError::Request(root_cause(&error))
        }
    }
}

// reqwest's Display is just "error sending request"; the useful part
// (DNS failure, refused connection, ...) sits at the bottom of the chain
fn root_cause(error: &(dyn std::error::Error + 'static)) -> String {
    let mut current = error;
    while let Some(next) = current.source() {
        current = next;
    }
    current.to_string()
}

// Client used for every page and image fetch
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
}

// Client that reports redirects instead of following them
pub fn build_probe_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::none())
        .build()
}

// Follows at most one redirect from `url`
//
// Sends a HEAD request so the seed body is only downloaded once, by the
// page fetch that follows. Returns the redirect target when the server
// answers 3xx with a usable Location header, otherwise the original URL.
// Failures are not fatal: the seed fetch will hit (and record) the same
// problem.
pub async fn follow_one_redirect(probe: &Client, url: &Url) -> Url {
    let response = match probe.head(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!(%url, error = %FetchError::from(e), "seed probe failed, scoping to the seed as given");
            return url.clone();
        }
    };

    if !response.status().is_redirection() {
        return url.clone();
    }

    let target = response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|location| url.join(location).ok())
        .filter(|target| matches!(target.scheme(), "http" | "https") && target.has_host());

    match target {
        Some(mut target) => {
            target.set_fragment(None);
            debug!(from = %url, to = %target, "seed redirected");
            target
        }
        None => url.clone(),
    }
}
