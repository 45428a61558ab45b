pub mod catalog;
pub mod error;
pub mod filterdoc;
pub mod merge;
pub mod report;
pub mod run;
pub mod sitemap;

pub use catalog::{CATALOG, Category};
pub use error::{CoreError, Result};
pub use filterdoc::FilterDocument;
pub use merge::merge;
pub use report::generate_run_report;
pub use run::{RunCategory, RunFailure, RunOptions, RunProgressCallback, RunSummary, execute_run};
pub use sitemap::SiteMap;
