// src/location.rs
// =============================================================================
// A Location is anything the spider can point at: a file on disk or a URL.
//
// Two locations are the same iff their canonical string forms are the same.
// Equality, hashing and ordering all go through `canonical()`, so a
// BTreeSet<Location> iterates in a stable, reproducible order.
// =============================================================================

use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Clone)]
pub enum Location {
    /// A file on the local filesystem (always absolute once resolved)
    File(PathBuf),
    /// A network resource (http/https)
    Url(Url),
}

impl Location {
    // The string form used for comparisons and reporting
    pub fn canonical(&self) -> Cow<'_, str> {
        match self {
            Location::File(path) => path.to_string_lossy(),
            Location::Url(url) => Cow::Borrowed(url.as_str()),
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Location::File(path) => Some(path),
            Location::Url(_) => None,
        }
    }

    pub fn as_url(&self) -> Option<&Url> {
        match self {
            Location::Url(url) => Some(url),
            Location::File(_) => None,
        }
    }

    // Trailing path segment: file name for paths, last non-empty URL segment
    pub fn basename(&self) -> Option<String> {
        match self {
            Location::File(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            Location::Url(url) => url
                .path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
                .map(str::to_string),
        }
    }

    // Lowercased extension of the trailing segment, without the dot
    pub fn extension(&self) -> Option<String> {
        let name = self.basename()?;
        Path::new(&name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for Location {}

impl Hash for Location {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical().cmp(&other.canonical())
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical())
    }
}

impl From<Url> for Location {
    fn from(url: Url) -> Self {
        Location::Url(url)
    }
}

impl From<PathBuf> for Location {
    fn from(path: PathBuf) -> Self {
        Location::File(path)
    }
}
