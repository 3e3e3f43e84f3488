// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// The flags mirror the classic "spider" exercise:
//   spider [-r] [-l [N]] [-o] [-p PATH] URL
//
// Validation of combinations (e.g. -l without -r) happens in
// CrawlConfig::new so the library and the CLI agree on the rules.
// =============================================================================

use clap::Parser;
use image_spider::config::{DEFAULT_CONCURRENCY, DEFAULT_DEST_DIR, DEFAULT_TIMEOUT};
use image_spider::CrawlOptions;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "spider",
    version,
    about = "Extract all images from a website or a local HTML file",
    long_about = "spider crawls a page (and, with -r, the pages it links to) and downloads \
                  every .jpg, .jpeg, .png, .gif and .bmp image it finds."
)]
pub struct Cli {
    /// URL or local .html file to start from (https:// is added if missing)
    #[arg(value_name = "URL")]
    pub url: String,

    /// Recursively follow links found on the page
    #[arg(short = 'r', long)]
    pub recursive: bool,

    /// Maximum depth of the recursive download (bare -l means 5)
    ///
    /// Requires -r.
    #[arg(
        short = 'l',
        long = "level",
        value_name = "N",
        num_args = 0..=1,
        default_missing_value = DEFAULT_MAX_DEPTH_STR,
    )]
    pub level: Option<usize>,

    /// Only follow links on the original hostname (or directory, for local files)
    ///
    /// Requires -r.
    #[arg(short = 'o', long = "original-host")]
    pub original_host: bool,

    /// Directory where downloaded images are saved
    #[arg(short = 'p', long = "path", value_name = "PATH", default_value = DEFAULT_DEST_DIR)]
    pub path: PathBuf,

    /// Print the report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// How many images to download at the same time
    #[arg(long, value_name = "N", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Show per-page debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

const DEFAULT_MAX_DEPTH_STR: &str = "5";

impl Cli {
    pub fn options(&self) -> CrawlOptions {
        CrawlOptions {
            recursive: self.recursive,
            max_depth: self.level,
            dest_dir: self.path.clone(),
            scope_to_original_host: self.original_host,
            request_timeout: Duration::from_secs(self.timeout),
            concurrency: self.concurrency,
            ..CrawlOptions::new(self.url.clone())
        }
    }
}
