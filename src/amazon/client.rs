//! HTTP client for search-result pages using wreq for TLS fingerprint emulation.

use crate::amazon::parser::{detect_block_page, BlockPage};
use crate::amazon::regions::Region;
use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use wreq::Client;
use wreq_util::Emulation;

/// Why a page could not be fetched.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: wreq::Error,
    },

    #[error("Rate limited (HTTP {status}). Try increasing --delay or using a proxy.")]
    RateLimited { status: u16 },

    #[error("Request failed with status: {status}")]
    Status { status: u16 },

    #[error("Failed to read response body: {0}")]
    Body(#[source] wreq::Error),

    #[error("Blocked by {0}. Try using a proxy or waiting before retrying.")]
    Blocked(BlockPage),
}

impl FetchError {
    /// Connection-level failures that may succeed on an immediate retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Timeout { .. } | FetchError::Network { .. })
    }

    fn from_transport(url: &str, source: wreq::Error) -> Self {
        if source.is_timeout() {
            FetchError::Timeout { url: url.to_string() }
        } else {
            FetchError::Network { url: url.to_string(), source }
        }
    }
}

/// Source of search-results pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the raw markup of results page `page` (1-based) for `keyword`.
    async fn fetch_page(&self, keyword: &str, page: u32) -> Result<String, FetchError>;

    /// Storefront the pages come from.
    fn region(&self) -> Region;
}

/// Search-page client with browser impersonation.
pub struct AmazonClient {
    client: Client,
    region: Region,
    user_agent: Option<String>,
    base_url: Option<String>,
}

impl AmazonClient {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(config, None)
    }

    /// Creates a client that talks to `base_url` instead of the region's storefront (for testing).
    pub fn with_base_url(config: &Config, base_url: Option<String>) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            region: config.region,
            user_agent: config.user_agent.clone(),
            base_url,
        })
    }

    fn base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| self.region.base_url())
    }

    fn search_url(&self, keyword: &str, page: u32) -> String {
        format!("{}/s?k={}&page={}", self.base_url(), urlencoding::encode(keyword.trim()), page)
    }

    /// One GET attempt, with block-page detection on the body.
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        debug!("GET {}", url);

        let referer = format!("{}/", self.base_url());
        let mut request = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8")
            .header("Accept-Language", self.region.accept_language())
            .header("Referer", referer.as_str())
            .header("Sec-Ch-Ua", "\"Chromium\";v=\"131\", \"Not_A Brand\";v=\"24\"")
            .header("Sec-Ch-Ua-Mobile", "?0")
            .header("Sec-Ch-Ua-Platform", "\"macOS\"")
            .header("Sec-Fetch-Dest", "document")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Upgrade-Insecure-Requests", "1");

        if let Some(user_agent) = &self.user_agent {
            request = request.header("User-Agent", user_agent.as_str());
        }

        let response =
            request.send().await.map_err(|e| FetchError::from_transport(url, e))?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status.as_u16() == 429 || status.as_u16() == 503 {
            warn!("Rate limited ({}). Consider using a proxy or increasing delay.", status);
            return Err(FetchError::RateLimited { status: status.as_u16() });
        }

        if !status.is_success() {
            return Err(FetchError::Status { status: status.as_u16() });
        }

        let final_url = response.uri().to_string();
        if self.base_url.is_none() && !final_url.contains(self.region.domain()) {
            warn!(
                "Redirected to different domain: {}. Your IP may be associated with a different region.",
                final_url
            );
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout { url: url.to_string() }
            } else {
                FetchError::Body(e)
            }
        })?;

        if let Some(block) = detect_block_page(&body) {
            warn!("Received {} instead of results", block);
            return Err(FetchError::Blocked(block));
        }

        Ok(body)
    }
}

#[async_trait]
impl PageFetcher for AmazonClient {
    async fn fetch_page(&self, keyword: &str, page: u32) -> Result<String, FetchError> {
        let url = self.search_url(keyword, page);
        info!("Searching: {} (page {})", keyword, page);

        match self.get(&url).await {
            Err(err) if err.is_transient() => {
                warn!("{}; retrying once", err);
                self.get(&url).await
            }
            other => other,
        }
    }

    fn region(&self) -> Region {
        self.region
    }
}
