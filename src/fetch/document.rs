// src/fetch/document.rs
// =============================================================================
// Retrieves one frontier location and says what it turned out to be.
//
// - Local .html/.htm files are read straight from disk
// - Local allow-listed images are reported as images without reading them
// - URLs are fetched with GET and classified by their Content-Type header
//
// Failures come back as FetchError; the scheduler records them and moves on.
// =============================================================================

use super::http::FetchError;
use crate::location::Location;
use crate::media::{self, MediaKind};
use reqwest::Client;
use tracing::debug;

#[derive(Debug)]
pub enum FetchResult {
    /// An HTML document worth scanning, with the location it was served
    /// from after redirects (relative references resolve against `base`)
    Html { body: Vec<u8>, base: Location },
    /// The location itself is an image (terminal, never scanned)
    ImageDirect(Location),
    /// Fetched fine, but nothing the spider indexes
    Empty,
}

#[derive(Debug, Clone)]
pub struct DocumentFetcher {
    client: Client,
}

impl DocumentFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn fetch(&self, loc: &Location) -> Result<FetchResult, FetchError> {
        match loc {
            Location::File(path) => {
                let ext = loc.extension().unwrap_or_default();
                if media::is_html_extension(&ext) {
                    let bytes = tokio::fs::read(path).await.map_err(|source| FetchError::Io {
                        path: path.clone(),
                        source,
                    })?;
                    Ok(FetchResult::Html {
                        body: bytes,
                        base: loc.clone(),
                    })
                } else if media::is_allowed_extension(&ext) {
                    Ok(FetchResult::ImageDirect(loc.clone()))
                } else {
                    Ok(FetchResult::Empty)
                }
            }
            Location::Url(url) => {
                let response = self.client.get(url.clone()).send().await?;

                let status = response.status();
                if !status.is_success() {
                    return Err(FetchError::Status(status));
                }

                let mut served_from = response.url().clone();
                served_from.set_fragment(None);
                if &served_from != url {
                    debug!(from = %url, to = %served_from, "followed redirect");
                }

                let content_type = response
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_string();

                match media::classify(&content_type) {
                    MediaKind::Html => {
                        let body = response.bytes().await?;
                        Ok(FetchResult::Html {
                            body: body.to_vec(),
                            base: Location::Url(served_from),
                        })
                    }
                    MediaKind::Image(_) => Ok(FetchResult::ImageDirect(loc.clone())),
                    MediaKind::Other => {
                        debug!(%url, content_type = %content_type, "not an indexable document");
                        Ok(FetchResult::Empty)
                    }
                }
            }
        }
    }
}
