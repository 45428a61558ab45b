pub mod error;
pub mod fetch;
pub mod heuristics;
pub mod resolve;
pub mod scan;

pub use error::{Result, ScrapeError};
pub use fetch::{Fetched, Governor};
pub use heuristics::normalize_host;
pub use resolve::{FACT_CHECK_HOST, HostCache, Resolver};
pub use scan::scan_category;
