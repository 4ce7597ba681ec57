//! Search command implementation.

use crate::amazon::{AmazonClient, PageFetcher};
use crate::config::{Config, OutputFormat};
use crate::format::{write_xlsx, Formatter};
use crate::pipeline::{Harvest, HarvestOptions, Harvester};
use crate::stats::Summary;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Result of one search run.
#[derive(Debug)]
pub struct SearchOutput {
    /// Records in the configured format; empty for Excel exports
    pub rendered: String,
    /// Statistics report, when requested
    pub stats: Option<String>,
    /// Export file the records were written to
    pub written_to: Option<PathBuf>,
    pub harvest: Harvest,
}

/// Picks the output format: an explicit flag wins, then the export file extension.
pub fn resolve_format(
    explicit: Option<OutputFormat>,
    output: Option<&Path>,
    configured: OutputFormat,
) -> OutputFormat {
    explicit.or_else(|| output.and_then(OutputFormat::from_extension)).unwrap_or(configured)
}

/// Executes a keyword search.
pub struct SearchCommand {
    config: Config,
    output: Option<PathBuf>,
    with_stats: bool,
}

impl SearchCommand {
    pub fn new(config: Config) -> Self {
        Self { config, output: None, with_stats: false }
    }

    /// Writes the formatted records to `path` instead of returning them for printing.
    pub fn output(mut self, path: Option<PathBuf>) -> Self {
        self.output = path;
        self
    }

    pub fn with_stats(mut self, enabled: bool) -> Self {
        self.with_stats = enabled;
        self
    }

    /// Executes the search against the live storefront.
    pub async fn execute(&self, keyword: &str) -> Result<SearchOutput> {
        let client = AmazonClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_client(&client, keyword).await
    }

    /// Executes the search with a provided fetcher (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl PageFetcher,
        keyword: &str,
    ) -> Result<SearchOutput> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            anyhow::bail!("Keyword must not be empty");
        }
        if self.config.format == OutputFormat::Xlsx && self.output.is_none() {
            anyhow::bail!("Excel output can only be written to a file; pass --output FILE.xlsx");
        }

        info!("Searching for: {} (up to {} pages)", keyword, self.config.max_pages);

        let harvest =
            Harvester::new(client, HarvestOptions::from_config(&self.config)).run(keyword).await;

        info!(
            "Collected {} products from {} pages ({})",
            harvest.records.len(),
            harvest.pages_fetched,
            harvest.status.label()
        );

        let rendered = match self.config.format {
            OutputFormat::Xlsx => String::new(),
            format => Formatter::new(format).format_records(&harvest.records)?,
        };

        let written_to = match &self.output {
            Some(path) => {
                if self.config.format == OutputFormat::Xlsx {
                    write_xlsx(&harvest.records, path)?;
                } else {
                    std::fs::write(path, format!("{}\n", rendered)).with_context(|| {
                        format!("Failed to write export file: {}", path.display())
                    })?;
                }
                info!("Wrote {} records to {}", harvest.records.len(), path.display());
                Some(path.clone())
            }
            None => None,
        };

        let stats = self.with_stats.then(|| Summary::from_records(&harvest.records).render());

        Ok(SearchOutput { rendered, stats, written_to, harvest })
    }
}
