use crate::error::{Result, ScrapeError};
use crate::fetch::{Fetched, Governor};
use crate::heuristics::{extract_hosts, normalize_host};
use scraper::Html;
use std::collections::HashMap;
use tracing::{debug, info};
use url::Url;

pub const FACT_CHECK_HOST: &str = "mediabiasfactcheck.com";

/// Seam between the resolver and the persistent site map. The on-disk cache
/// lives in resfilter-core; tests use the HashMap impl below.
pub trait HostCache {
    fn lookup(&self, listing_url: &str) -> Option<String>;
    fn record(&mut self, listing_url: &str, host: &str);
}

impl HostCache for HashMap<String, String> {
    fn lookup(&self, listing_url: &str) -> Option<String> {
        self.get(listing_url).cloned()
    }

    fn record(&mut self, listing_url: &str, host: &str) {
        self.insert(listing_url.to_string(), host.to_string());
    }
}

/// Resolves listing URLs to canonical publisher hosts.
pub struct Resolver {
    fact_check_host: String,
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            fact_check_host: FACT_CHECK_HOST.to_string(),
        }
    }

    /// Override the fact-check site host. Tests point this at a mock server.
    pub fn with_fact_check_host(mut self, host: impl Into<String>) -> Self {
        self.fact_check_host = host.into();
        self
    }

    /// Resolve one listing URL to its canonical publisher host(s).
    ///
    /// Cache hits return without any network activity. Listings that are
    /// already external publisher links normalize directly. Everything else
    /// fetches the detail page through the governor and runs the heuristic
    /// chain. The primary (first) host is written through to the cache; the
    /// caller is responsible for flushing it to disk.
    pub async fn resolve(
        &self,
        listing_url: &str,
        cache: &mut dyn HostCache,
        governor: &mut Governor,
    ) -> Result<Vec<String>> {
        if let Some(host) = cache.lookup(listing_url) {
            debug!("Cache hit for {} -> {}", listing_url, host);
            return Ok(vec![host]);
        }

        if !self.is_fact_check_url(listing_url) {
            // The listing is already an outbound publisher link.
            let host = normalize_host(listing_url);
            if host.is_empty() {
                return Err(ScrapeError::InvalidUrl(listing_url.to_string()));
            }
            cache.record(listing_url, &host);
            return Ok(vec![host]);
        }

        let body = match governor.fetch(listing_url).await? {
            Fetched::Body(body) => body,
            Fetched::Status(status) => {
                return Err(ScrapeError::FetchStatus {
                    url: listing_url.to_string(),
                    status,
                });
            }
        };

        let hosts = extract_hosts(&Html::parse_document(&body));
        if hosts.is_empty() {
            return Err(ScrapeError::NoSource {
                url: listing_url.to_string(),
            });
        }

        info!("Resolved {} -> {:?}", listing_url, hosts);
        cache.record(listing_url, &hosts[0]);
        Ok(hosts)
    }

    fn is_fact_check_url(&self, listing_url: &str) -> bool {
        if let Ok(parsed) = Url::parse(listing_url)
            && let Some(host) = parsed.host_str()
        {
            let port_suffix = parsed.port().map(|p| format!(":{}", p)).unwrap_or_default();
            let authority = format!("{}{}", host, port_suffix);
            return authority == self.fact_check_host
                || host == self.fact_check_host
                || host.ends_with(&format!(".{}", self.fact_check_host));
        }
        false
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}
