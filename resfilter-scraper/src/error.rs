use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} fetching {url}")]
    FetchStatus { url: String, status: u16 },

    #[error("expected page structure missing: {0}")]
    Structure(String),

    #[error("rate limited on {url}, gave up after {attempts} attempts")]
    ExhaustedRetries { url: String, attempts: u32 },

    #[error("no source domain found on {url}")]
    NoSource { url: String },

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
