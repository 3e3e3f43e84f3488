// src/lib.rs
// =============================================================================
// image-spider: crawl a site (or a local HTML file) for images and save them.
//
// The pipeline is two phases:
// 1. crawl: breadth-first traversal collecting visited pages and image refs
// 2. download: every discovered image is copied or fetched into dest_dir
//
// Only configuration problems are fatal. Everything else ends up in the
// report's error log.
// =============================================================================

pub mod config;
pub mod crawl;
pub mod download;
pub mod fetch;
pub mod location;
pub mod logging;
pub mod media;
pub mod report;
pub mod scan;

pub use config::{ConfigError, CrawlConfig, CrawlOptions};
pub use crawl::{CancelFlag, Crawler};
pub use download::Materializer;
pub use location::Location;
pub use report::CrawlReport;

// Runs both phases with a validated configuration
pub async fn run(config: &CrawlConfig, cancel: CancelFlag) -> Result<CrawlReport, ConfigError> {
    let client = fetch::build_client(config.request_timeout).map_err(ConfigError::HttpClient)?;
    let probe = fetch::build_probe_client(config.request_timeout).map_err(ConfigError::HttpClient)?;

    let crawler = Crawler::new(client.clone(), probe, config.scope_to_original_host, cancel.clone());
    let outcome = crawler.crawl(config.seed.clone(), config.max_depth).await;

    let mut state = outcome.state;
    let materializer = Materializer::new(client, config.concurrency, cancel.clone());
    let downloads = materializer
        .materialize(&state.images, &config.dest_dir, &mut state.errors)
        .await;

    Ok(CrawlReport {
        seed: outcome.seed,
        scope: outcome.scope.filter(|_| config.scope_to_original_host).map(|s| s.to_string()),
        visited: state.visited,
        images: state.images.into_iter().collect(),
        downloads,
        errors: state.errors,
        cancelled: outcome.cancelled || cancel.is_cancelled(),
    })
}
