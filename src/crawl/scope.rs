// src/crawl/scope.rs
// =============================================================================
// The boundary the spider is allowed to expand within.
//
// A network seed is scoped to its host (after the seed's single redirect has
// been followed). A local seed is scoped to the directory holding it.
// =============================================================================

use crate::location::Location;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Host(String),
    Directory(PathBuf),
}

impl Scope {
    // None when the seed has no usable host or parent directory
    pub fn of(seed: &Location) -> Option<Self> {
        match seed {
            Location::Url(url) => url.host_str().map(|host| Scope::Host(host.to_ascii_lowercase())),
            Location::File(path) => path.parent().map(|dir| Scope::Directory(dir.to_path_buf())),
        }
    }

    // Children of the wrong kind, or without a host/parent, are outside
    pub fn contains(&self, child: &Location) -> bool {
        match (self, child) {
            (Scope::Host(host), Location::Url(url)) => url
                .host_str()
                .is_some_and(|child_host| child_host.eq_ignore_ascii_case(host)),
            (Scope::Directory(dir), Location::File(path)) => {
                path.parent().is_some_and(|parent| parent == dir)
            }
            _ => false,
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Host(host) => write!(f, "host {}", host),
            Scope::Directory(dir) => write!(f, "directory {}", dir.display()),
        }
    }
}
