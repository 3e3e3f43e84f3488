// src/download/materialize.rs
// =============================================================================
// Turns the discovered image set into files on disk.
//
// Key functionality:
// - Local images are byte-copied
// - Network images are fetched and validated before anything is written:
//   2xx status, a Content-Type header, an image type, an allowed extension
// - Downloads run concurrently but in order, so indices (and file names)
//   are the same on every run
// - Every failure is recorded; the rest of the batch keeps going
// =============================================================================

use super::filename::{destination_name, pad_width};
use crate::crawl::{CancelFlag, ErrorLog};
use crate::fetch::FetchError;
use crate::location::Location;
use crate::media::{self, MediaKind};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

// What happened to one image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum DownloadOutcome {
    /// Written to this path
    Saved(PathBuf),
    /// Rejected before writing (wrong type, missing file, ...)
    Skipped(String),
    /// Tried and failed (network or disk)
    Failed(String),
}

#[derive(Debug, Default, Serialize)]
pub struct MaterializeReport {
    pub outcomes: Vec<(Location, DownloadOutcome)>,
    pub saved: usize,
    pub total: usize,
}

#[derive(Debug, Clone)]
pub struct Materializer {
    client: Client,
    concurrency: usize,
    cancel: CancelFlag,
}

impl Materializer {
    pub fn new(client: Client, concurrency: usize, cancel: CancelFlag) -> Self {
        Self {
            client,
            concurrency: concurrency.max(1),
            cancel,
        }
    }

    // Realizes every image under `dest`, recording failures in `errors`
    pub async fn materialize(
        &self,
        images: &BTreeSet<Location>,
        dest: &Path,
        errors: &mut ErrorLog,
    ) -> MaterializeReport {
        let total = images.len();
        let width = pad_width(total);
        info!(total, dest = %dest.display(), "downloading images");

        // Indices are fixed here, before any request starts
        let jobs = images.iter().enumerate().map(|(index, location)| async move {
            if self.cancel.is_cancelled() {
                return None;
            }
            let outcome = self.materialize_one(index, width, location, dest).await;
            Some((location.clone(), outcome))
        });

        let outcomes: Vec<(Location, DownloadOutcome)> = stream::iter(jobs)
            .buffered(self.concurrency)
            .filter_map(|done| async move { done })
            .collect()
            .await;

        let mut saved = 0;
        for (location, outcome) in &outcomes {
            match outcome {
                DownloadOutcome::Saved(path) => {
                    debug!(%location, path = %path.display(), "saved");
                    saved += 1;
                }
                DownloadOutcome::Skipped(reason) | DownloadOutcome::Failed(reason) => {
                    errors.record(format!("Image {}", location), reason)
                }
            }
        }

        info!(saved, total, "downloads finished");
        MaterializeReport {
            outcomes,
            saved,
            total,
        }
    }

    async fn materialize_one(
        &self,
        index: usize,
        width: usize,
        location: &Location,
        dest: &Path,
    ) -> DownloadOutcome {
        match location {
            Location::File(path) => copy_local(index, width, location, path, dest).await,
            Location::Url(url) => self.download(index, width, location, url, dest).await,
        }
    }

    async fn download(
        &self,
        index: usize,
        width: usize,
        location: &Location,
        url: &Url,
        dest: &Path,
    ) -> DownloadOutcome {
        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => return DownloadOutcome::Failed(FetchError::from(e).to_string()),
        };

        let status = response.status();
        if !status.is_success() {
            return DownloadOutcome::Failed(FetchError::Status(status).to_string());
        }

        let Some(content_type) = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
        else {
            return DownloadOutcome::Skipped("response has no Content-Type".to_string());
        };

        let mime = match media::classify(&content_type) {
            MediaKind::Image(mime) => mime,
            _ => {
                return DownloadOutcome::Skipped(format!(
                    "content type {} is not an image",
                    content_type
                ))
            }
        };
        let Some(extension) = media::extension_for_mime(&mime) else {
            return DownloadOutcome::Skipped(format!("image type {} is not allowed", mime));
        };

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return DownloadOutcome::Failed(FetchError::from(e).to_string()),
        };

        let target = dest.join(destination_name(index, width, location, extension));
        write_file(&target, &body).await
    }
}

async fn copy_local(
    index: usize,
    width: usize,
    location: &Location,
    path: &Path,
    dest: &Path,
) -> DownloadOutcome {
    if !path.is_file() {
        return DownloadOutcome::Skipped("local file does not exist".to_string());
    }
    let ext = location.extension().unwrap_or_default();
    let Some(extension) = media::canonical_extension(&ext) else {
        return DownloadOutcome::Skipped(format!("extension '.{}' is not allowed", ext));
    };

    let target = dest.join(destination_name(index, width, location, extension));
    match tokio::fs::copy(path, &target).await {
        Ok(_) => DownloadOutcome::Saved(target),
        Err(e) => {
            let _ = tokio::fs::remove_file(&target).await;
            DownloadOutcome::Failed(format!("failed to copy to {}: {}", target.display(), e))
        }
    }
}

// Writes the whole body, removing the file again if the write fails midway
async fn write_file(target: &Path, body: &[u8]) -> DownloadOutcome {
    match tokio::fs::write(target, body).await {
        Ok(()) => DownloadOutcome::Saved(target.to_path_buf()),
        Err(e) => {
            let _ = tokio::fs::remove_file(target).await;
            DownloadOutcome::Failed(format!("failed to write {}: {}", target.display(), e))
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. buffered vs buffer_unordered
//    - Both run up to N futures at once
//    - buffered() yields results in the original order, so outcomes line up
//      with the indices baked into the file names
//
// 2. Why read the whole body before writing?
//    - Validation happens on headers; the body is only written once it is
//      complete, so a dropped connection never leaves half a file behind
// -----------------------------------------------------------------------------
