use crate::error::{CoreError, Result};
use resfilter_scraper::HostCache;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The persistent listing-URL -> canonical-host memoization store.
///
/// Backed by a flat JSON object on disk. Entries are never invalidated and
/// there is no TTL; correctness leans on the fact-check site being
/// append-only in practice. Only the primary host of a multi-host
/// resolution is stored. `flush` rewrites the whole file, so a run killed
/// at any point leaves the file self-consistent.
#[derive(Debug, Default)]
pub struct SiteMap {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl SiteMap {
    /// Load the site map from disk. A missing or malformed file is an
    /// empty cache, not an error.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(
                        "Site map {} is malformed ({}), starting empty",
                        path.display(),
                        e
                    );
                    BTreeMap::new()
                }
            },
            Err(_) => {
                debug!("No site map at {}, starting empty", path.display());
                BTreeMap::new()
            }
        };

        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, listing_url: &str) -> Option<&str> {
        self.entries.get(listing_url).map(String::as_str)
    }

    pub fn insert(&mut self, listing_url: impl Into<String>, host: impl Into<String>) {
        self.entries.insert(listing_url.into(), host.into());
    }

    /// Every cached host, in key order.
    pub fn hosts(&self) -> Vec<String> {
        self.entries.values().cloned().collect()
    }

    /// Rewrite the whole file with the accumulated cache. Called after
    /// every successful resolution so partial progress survives a crash.
    pub fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| CoreError::Cache {
                path: self.path.clone(),
                source,
            })?;
        }

        let raw = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, raw).map_err(|source| CoreError::Cache {
            path: self.path.clone(),
            source,
        })
    }
}

impl HostCache for SiteMap {
    fn lookup(&self, listing_url: &str) -> Option<String> {
        self.entries.get(listing_url).cloned()
    }

    fn record(&mut self, listing_url: &str, host: &str) {
        self.insert(listing_url, host);
    }
}
