//! Sequential page driver: fetch, parse, collect, and decide when to stop.

use crate::amazon::client::{FetchError, PageFetcher};
use crate::amazon::models::ProductRecord;
use crate::amazon::parser::ListingParser;
use crate::config::Config;
use rand::Rng;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Limits and pacing for one run.
#[derive(Debug, Clone)]
pub struct HarvestOptions {
    /// Highest page number to request
    pub max_pages: u32,
    /// Stop once this many records were collected
    pub max_items: Option<usize>,
    /// Pause between page requests
    pub delay: Duration,
    /// Upper bound of random extra pause
    pub jitter: Duration,
}

impl HarvestOptions {
    pub fn new(max_pages: u32) -> Self {
        Self { max_pages, max_items: None, delay: Duration::ZERO, jitter: Duration::ZERO }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            max_pages: config.max_pages,
            max_items: config.max_items.filter(|n| *n > 0),
            delay: Duration::from_millis(config.delay_ms),
            jitter: Duration::from_millis(config.delay_jitter_ms),
        }
    }
}

/// Why a run ended.
#[derive(Debug)]
pub enum HarvestStatus {
    /// Every page up to the page limit returned listings.
    Complete,
    /// The item cap was reached.
    TruncatedByLimit,
    /// `page` returned no listings.
    TruncatedByEmptyPage { page: u32 },
    /// Fetching `page` failed; earlier pages are kept.
    TruncatedByError { page: u32, error: FetchError },
}

impl HarvestStatus {
    pub fn is_error(&self) -> bool {
        matches!(self, HarvestStatus::TruncatedByError { .. })
    }

    /// Short machine-friendly name.
    pub fn label(&self) -> &'static str {
        match self {
            HarvestStatus::Complete => "complete",
            HarvestStatus::TruncatedByLimit => "truncated-by-limit",
            HarvestStatus::TruncatedByEmptyPage { .. } => "truncated-by-empty-page",
            HarvestStatus::TruncatedByError { .. } => "truncated-by-error",
        }
    }
}

impl fmt::Display for HarvestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarvestStatus::Complete => write!(f, "complete"),
            HarvestStatus::TruncatedByLimit => write!(f, "stopped at the item limit"),
            HarvestStatus::TruncatedByEmptyPage { page } => {
                write!(f, "no more listings (page {} was empty)", page)
            }
            HarvestStatus::TruncatedByError { page, error } => {
                write!(f, "stopped by fetch error on page {}: {}", page, error)
            }
        }
    }
}

/// Records collected by one run, in page order.
#[derive(Debug)]
pub struct Harvest {
    pub keyword: String,
    pub records: Vec<ProductRecord>,
    pub pages_fetched: u32,
    pub status: HarvestStatus,
}

/// Drives the fetcher page by page, strictly one request at a time.
pub struct Harvester<'a, F: PageFetcher + ?Sized> {
    fetcher: &'a F,
    parser: ListingParser,
    options: HarvestOptions,
}

impl<'a, F: PageFetcher + ?Sized> Harvester<'a, F> {
    pub fn new(fetcher: &'a F, options: HarvestOptions) -> Self {
        let parser = ListingParser::new(fetcher.region());
        Self { fetcher, parser, options }
    }

    /// Collects records for `keyword` starting at page 1.
    pub async fn run(&self, keyword: &str) -> Harvest {
        let mut records: Vec<ProductRecord> = Vec::new();
        let mut pages_fetched = 0;

        let status = 'pages: {
            for page in 1..=self.options.max_pages {
                if page > 1 {
                    self.pause().await;
                }

                let html = match self.fetcher.fetch_page(keyword, page).await {
                    Ok(html) => html,
                    Err(error) => {
                        warn!("Fetching page {} failed: {}", page, error);
                        break 'pages HarvestStatus::TruncatedByError { page, error };
                    }
                };
                pages_fetched += 1;

                let page_records = self.parser.parse_page(&html);
                if page_records.is_empty() {
                    info!("No listings on page {}, stopping", page);
                    break 'pages HarvestStatus::TruncatedByEmptyPage { page };
                }

                records.extend(page_records);
                info!("Page {} done (total={})", page, records.len());

                if let Some(cap) = self.options.max_items {
                    if records.len() >= cap {
                        let cut = records.len() > cap;
                        records.truncate(cap);
                        if cut || page < self.options.max_pages {
                            debug!("Reached item limit of {}", cap);
                            break 'pages HarvestStatus::TruncatedByLimit;
                        }
                    }
                }
            }
            HarvestStatus::Complete
        };

        Harvest { keyword: keyword.to_string(), records, pages_fetched, status }
    }

    async fn pause(&self) {
        let mut total = self.options.delay;

        let jitter_ms = self.options.jitter.as_millis() as u64;
        if jitter_ms > 0 {
            total += Duration::from_millis(rand::rng().random_range(0..=jitter_ms));
        }

        if !total.is_zero() {
            debug!("Delaying {}ms", total.as_millis());
            tokio::time::sleep(total).await;
        }
    }
}
