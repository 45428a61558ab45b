use crate::error::{Result, ScrapeError};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

// MediaBiasFactCheck serves a challenge page to obviously-robotic agents,
// so requests go out with a plain desktop browser identity.
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows; U; Windows NT 5.1; de; rv:1.9.1.5) Gecko/20091102 Firefox/3.5.5";

const DEFAULT_BASE_PAUSE: Duration = Duration::from_secs(60);
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Outcome of a governed fetch. HTTP 429 never escapes here: the governor
/// retries it internally and reports `ExhaustedRetries` past the ceiling.
#[derive(Debug)]
pub enum Fetched {
    Body(String),
    Status(u16),
}

/// Wraps every outbound fetch with rate-limit backoff.
///
/// The pause counter is shared across the whole run and never resets, so
/// each successive throttle backs off longer than the one before it, even
/// when the throttles land on different listings.
pub struct Governor {
    client: Client,
    base_pause: Duration,
    pauses: u32,
    max_attempts: u32,
}

impl Governor {
    pub fn new(timeout_secs: u64) -> Self {
        Self::with_base_pause(timeout_secs, DEFAULT_BASE_PAUSE)
    }

    pub fn with_base_pause(timeout_secs: u64, base_pause: Duration) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_pause,
            pauses: 0,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Total number of rate-limit pauses taken so far in this run.
    pub fn pauses(&self) -> u32 {
        self.pauses
    }

    /// Fetch a page, backing off and retrying on HTTP 429. Any other
    /// non-2xx status is returned for the caller to classify.
    pub async fn fetch(&mut self, url: &str) -> Result<Fetched> {
        for attempt in 1..=self.max_attempts {
            match self.fetch_once(url).await? {
                Once::Throttled => {
                    // No point sleeping when there is no attempt left to spend.
                    if attempt == self.max_attempts {
                        break;
                    }
                    self.pauses += 1;
                    let delay = self.base_pause * self.pauses;
                    warn!(
                        "Rate limited on {} (attempt {}/{}), pausing for {:?}",
                        url, attempt, self.max_attempts, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Once::Body(body) => return Ok(Fetched::Body(body)),
                Once::Status(status) => return Ok(Fetched::Status(status)),
            }
        }

        Err(ScrapeError::ExhaustedRetries {
            url: url.to_string(),
            attempts: self.max_attempts,
        })
    }

    async fn fetch_once(&self, url: &str) -> Result<Once> {
        debug!("Fetching {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Ok(Once::Throttled);
        }
        if !status.is_success() {
            return Ok(Once::Status(status.as_u16()));
        }

        Ok(Once::Body(response.text().await?))
    }
}

enum Once {
    Body(String),
    Throttled,
    Status(u16),
}
