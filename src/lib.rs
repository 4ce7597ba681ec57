//! listing-harvest - keyword product-listing scraper
//!
//! Fetches search-result pages one at a time, parses each listing into a
//! [`ProductRecord`], and renders the collection as a table, statistics
//! report, or CSV/JSON/Markdown export.

pub mod amazon;
pub mod commands;
pub mod config;
pub mod format;
pub mod pipeline;
pub mod stats;

pub use amazon::models::ProductRecord;
pub use amazon::regions::Region;
pub use config::Config;
pub use pipeline::{Harvest, HarvestOptions, HarvestStatus, Harvester};
