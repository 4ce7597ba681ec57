//! Storefront-specific modules: HTTP client, parsing, selectors and records.

pub mod client;
pub mod models;
pub mod parser;
pub mod regions;
pub mod selectors;

pub use client::{AmazonClient, FetchError, PageFetcher};
pub use models::ProductRecord;
pub use parser::{BlockPage, ListingParser};
pub use regions::Region;
