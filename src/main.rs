//! listing-harvest - keyword search scraper for storefront result pages
//!
//! Walks the first N result pages for a keyword and collects one record per listing.

use anyhow::Result;
use clap::{Parser, Subcommand};
use listing_harvest::amazon::regions::Region;
use listing_harvest::commands::search::{resolve_format, SearchCommand};
use listing_harvest::config::{Config, OutputFormat};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "listing-harvest",
    version,
    about = "Collect product listings from storefront keyword searches",
    long_about = "Fetches search-result pages for a keyword, extracts title, seller, price, rating and link for every listing, and prints or exports the records."
)]
struct Cli {
    /// Storefront region
    #[arg(short, long, global = true)]
    region: Option<Region>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "HARVEST_PROXY")]
    proxy: Option<String>,

    /// Delay between page requests in milliseconds
    #[arg(long, global = true)]
    delay: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format (defaults to the export file extension, then table)
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect listings for a keyword
    #[command(alias = "s")]
    Search {
        /// Search keyword
        keyword: String,

        /// Number of result pages to fetch
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        pages: Option<u32>,

        /// Stop after this many listings
        #[arg(long)]
        max_items: Option<usize>,

        /// Print a statistics report after the records
        #[arg(long)]
        stats: bool,

        /// Write records to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List supported regions
    Regions,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(region) = cli.region {
        config.region = region;
    }
    if let Some(delay) = cli.delay {
        config.delay_ms = delay;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }

    match cli.command {
        Commands::Search { keyword, pages, max_items, stats, output } => {
            if let Some(pages) = pages {
                config.max_pages = pages;
            }
            if max_items.is_some() {
                config.max_items = max_items;
            }
            config.format = resolve_format(cli.format, output.as_deref(), config.format);

            let cmd = SearchCommand::new(config).output(output).with_stats(stats);
            let result = cmd.execute(&keyword).await?;

            match &result.written_to {
                Some(path) => eprintln!(
                    "Saved {} products to {}",
                    result.harvest.records.len(),
                    path.display()
                ),
                None => println!("{}", result.rendered),
            }

            if let Some(report) = &result.stats {
                println!("\n{}", report);
            }

            eprintln!(
                "Fetched {} page(s): {}",
                result.harvest.pages_fetched, result.harvest.status
            );

            if result.harvest.status.is_error() {
                anyhow::bail!("Search incomplete: {}", result.harvest.status);
            }
        }

        Commands::Regions => {
            println!("Supported regions:\n");
            println!("{:<6} {:<20} {:<10}", "Code", "Domain", "Currency");
            println!("{:-<6} {:-<20} {:-<10}", "", "", "");

            for region in Region::all() {
                println!(
                    "{:<6} {:<20} {:<10}",
                    region.to_string(),
                    region.domain(),
                    region.currency()
                );
            }
        }
    }

    Ok(())
}
