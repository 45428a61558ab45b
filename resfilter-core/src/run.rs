use crate::catalog::Category;
use crate::error::Result;
use crate::sitemap::SiteMap;
use resfilter_scraper::{FACT_CHECK_HOST, Fetched, Governor, Resolver, scan_category};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// A category selected for this run. Owned strings so tests can point the
/// run at a mock server.
#[derive(Debug, Clone)]
pub struct RunCategory {
    pub url: String,
    pub title: String,
}

impl From<&Category> for RunCategory {
    fn from(category: &Category) -> Self {
        Self {
            url: category.url.to_string(),
            title: category.title.to_string(),
        }
    }
}

/// Options for one scan-and-resolve run.
pub struct RunOptions {
    pub categories: Vec<RunCategory>,
    pub timeout_secs: u64,
    pub base_pause: Duration,
    pub max_attempts: u32,
    pub fact_check_host: String,
}

impl RunOptions {
    pub fn new(categories: Vec<RunCategory>) -> Self {
        Self {
            categories,
            timeout_secs: 10,
            base_pause: Duration::from_secs(60),
            max_attempts: 5,
            fact_check_host: FACT_CHECK_HOST.to_string(),
        }
    }
}

/// Callback for reporting run progress to the presentation layer.
pub type RunProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// One listing or category page that produced nothing this run.
#[derive(Debug, Clone, Serialize)]
pub struct RunFailure {
    pub url: String,
    pub reason: String,
}

/// What a run produced: hosts to merge and the per-item failure report.
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    pub listings_attempted: usize,
    pub listings_resolved: usize,
    pub new_hosts: Vec<String>,
    pub failures: Vec<RunFailure>,
    pub pauses: u32,
}

/// Scan each selected category and resolve its unregistered listings,
/// sequentially, one request in flight at a time.
///
/// The site map is flushed after every successful resolution, so a killed
/// run loses nothing. A failed category scan or listing resolution is
/// recorded and the run continues; only a site-map flush failure is fatal.
pub async fn execute_run(
    options: RunOptions,
    already_filtered: &HashSet<String>,
    site_map: &mut SiteMap,
    progress: Option<RunProgressCallback>,
) -> Result<RunSummary> {
    let report = |msg: String| {
        if let Some(ref callback) = progress {
            callback(msg);
        }
    };

    let mut governor = Governor::with_base_pause(options.timeout_secs, options.base_pause)
        .with_max_attempts(options.max_attempts);
    let resolver = Resolver::new().with_fact_check_host(options.fact_check_host.clone());

    let mut summary = RunSummary::default();
    let mut seen_hosts: HashSet<String> = HashSet::new();

    for category in &options.categories {
        report(format!("Scanning {}", category.title));
        info!("Scanning category '{}' at {}", category.title, category.url);

        let listings = match governor.fetch(&category.url).await {
            Ok(Fetched::Body(body)) => {
                match scan_category(&body, &category.url, already_filtered, site_map) {
                    Ok(listings) => listings,
                    Err(e) => {
                        warn!("Category '{}' scan failed: {}", category.title, e);
                        summary.failures.push(RunFailure {
                            url: category.url.clone(),
                            reason: e.to_string(),
                        });
                        continue;
                    }
                }
            }
            Ok(Fetched::Status(status)) => {
                warn!("Category '{}' returned status {}", category.title, status);
                summary.failures.push(RunFailure {
                    url: category.url.clone(),
                    reason: format!("unexpected status {}", status),
                });
                continue;
            }
            Err(e) => {
                summary.failures.push(RunFailure {
                    url: category.url.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        info!(
            "Category '{}': {} listing(s) to resolve",
            category.title,
            listings.len()
        );

        for listing in listings {
            summary.listings_attempted += 1;
            report(format!("Resolving {}", listing));

            match resolver.resolve(&listing, site_map, &mut governor).await {
                Ok(hosts) => {
                    summary.listings_resolved += 1;
                    for host in hosts {
                        if seen_hosts.insert(host.clone()) {
                            summary.new_hosts.push(host);
                        }
                    }
                    site_map.flush()?;
                }
                Err(e) => {
                    summary.failures.push(RunFailure {
                        url: listing,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    summary.pauses = governor.pauses();
    Ok(summary)
}
