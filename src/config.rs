// src/config.rs
// =============================================================================
// Validated crawl configuration.
//
// `CrawlOptions` is the raw input (what the CLI collected); `CrawlConfig` is
// what the crawler runs with. Everything that can be wrong with the input is
// a ConfigError, raised before any page is fetched.
// =============================================================================

use crate::crawl::Scope;
use crate::location::Location;
use crate::media;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_MAX_DEPTH: usize = 5;
pub const DEFAULT_DEST_DIR: &str = "./data/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CONCURRENCY: usize = 8;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid seed '{seed}': {reason}")]
    InvalidSeed { seed: String, reason: String },

    #[error("maximum depth must be greater than 0")]
    InvalidDepth,

    #[error("{0} requires recursive mode")]
    RequiresRecursive(&'static str),

    #[error("'{0}' has no hostname, so the crawl cannot be scoped to it")]
    SeedHasNoScope(String),

    #[error("{} exists and is not a directory", .0.display())]
    DestNotDirectory(PathBuf),

    #[error("failed to create directory {}: {source}", path.display())]
    CreateDest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} must be greater than 0")]
    Zero(&'static str),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

// Raw, unvalidated options
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub seed: String,
    pub recursive: bool,
    pub max_depth: Option<usize>,
    pub dest_dir: PathBuf,
    pub scope_to_original_host: bool,
    pub request_timeout: Duration,
    pub concurrency: usize,
}

impl CrawlOptions {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            recursive: false,
            max_depth: None,
            dest_dir: PathBuf::from(DEFAULT_DEST_DIR),
            scope_to_original_host: false,
            request_timeout: DEFAULT_TIMEOUT,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub seed: Location,
    /// 0 means "scan the seed only"
    pub max_depth: usize,
    pub dest_dir: PathBuf,
    pub scope_to_original_host: bool,
    pub request_timeout: Duration,
    pub concurrency: usize,
}

impl CrawlConfig {
    // Validates the options and prepares the destination directory
    pub fn new(options: CrawlOptions) -> Result<Self, ConfigError> {
        if !options.recursive {
            if options.max_depth.is_some() {
                return Err(ConfigError::RequiresRecursive("a maximum depth"));
            }
            if options.scope_to_original_host {
                return Err(ConfigError::RequiresRecursive("original-host scoping"));
            }
        }
        if options.max_depth == Some(0) {
            return Err(ConfigError::InvalidDepth);
        }
        if options.request_timeout.is_zero() {
            return Err(ConfigError::Zero("request timeout"));
        }
        if options.concurrency == 0 {
            return Err(ConfigError::Zero("concurrency"));
        }

        let seed = parse_seed(&options.seed)?;
        if options.scope_to_original_host && Scope::of(&seed).is_none() {
            return Err(ConfigError::SeedHasNoScope(seed.to_string()));
        }

        prepare_dest_dir(&options.dest_dir)?;

        let max_depth = if options.recursive {
            options.max_depth.unwrap_or(DEFAULT_MAX_DEPTH)
        } else {
            0
        };

        Ok(Self {
            seed,
            max_depth,
            dest_dir: options.dest_dir,
            scope_to_original_host: options.scope_to_original_host,
            request_timeout: options.request_timeout,
            concurrency: options.concurrency,
        })
    }
}

// Turns the user's seed string into a Location
//
// Examples:
//   "./site/index.html"   -> File("/abs/site/index.html")  (if it exists)
//   "example.com/gallery" -> Url("https://example.com/gallery")
//   "http://example.com"  -> Url("http://example.com/")
pub fn parse_seed(seed: &str) -> Result<Location, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidSeed {
        seed: seed.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = seed.trim();
    if trimmed.is_empty() {
        return Err(invalid("empty"));
    }

    let path = Path::new(trimmed);
    if path.is_file() {
        let is_html = path
            .extension()
            .is_some_and(|ext| media::is_html_extension(&ext.to_string_lossy()));
        if !is_html {
            return Err(invalid("local seeds must be .html files"));
        }
        let absolute = std::fs::canonicalize(path).map_err(|e| invalid(&e.to_string()))?;
        return Ok(Location::File(absolute));
    }

    let parsed = match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url,
        // "example.com" or "localhost:8080/x": no scheme, or a host read as one
        Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) if !trimmed.contains("://") => {
            Url::parse(&format!("https://{}", trimmed)).map_err(|e| invalid(&e.to_string()))?
        }
        Ok(url) => return Err(invalid(&format!("unsupported scheme '{}'", url.scheme()))),
        Err(e) => return Err(invalid(&e.to_string())),
    };

    if !parsed.has_host() {
        return Err(invalid("no host"));
    }
    let mut url = parsed;
    url.set_fragment(None);
    Ok(Location::Url(url))
}

fn prepare_dest_dir(dir: &Path) -> Result<(), ConfigError> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(ConfigError::DestNotDirectory(dir.to_path_buf()));
        }
        return Ok(());
    }
    std::fs::create_dir_all(dir).map_err(|source| ConfigError::CreateDest {
        path: dir.to_path_buf(),
        source,
    })
}
