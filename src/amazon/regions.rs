//! Storefront regions: domain, currency and locale conventions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marketplaces the harvester knows how to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Us,
    Uk,
    Ca,
    Au,
    In,
    De,
    Fr,
    Es,
    It,
    Jp,
}

impl Region {
    const ALL: [Region; 10] = [
        Region::Us,
        Region::Uk,
        Region::Ca,
        Region::Au,
        Region::In,
        Region::De,
        Region::Fr,
        Region::Es,
        Region::It,
        Region::Jp,
    ];

    pub fn domain(&self) -> &'static str {
        match self {
            Region::Us => "amazon.com",
            Region::Uk => "amazon.co.uk",
            Region::Ca => "amazon.ca",
            Region::Au => "amazon.com.au",
            Region::In => "amazon.in",
            Region::De => "amazon.de",
            Region::Fr => "amazon.fr",
            Region::Es => "amazon.es",
            Region::It => "amazon.it",
            Region::Jp => "amazon.co.jp",
        }
    }

    /// Scheme + host, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("https://www.{}", self.domain())
    }

    pub fn currency(&self) -> &'static str {
        match self {
            Region::Us => "USD",
            Region::Uk => "GBP",
            Region::Ca => "CAD",
            Region::Au => "AUD",
            Region::In => "INR",
            Region::De | Region::Fr | Region::Es | Region::It => "EUR",
            Region::Jp => "JPY",
        }
    }

    /// Value sent as `Accept-Language` so the storefront answers in its own locale.
    pub fn accept_language(&self) -> &'static str {
        match self {
            Region::Us | Region::Ca | Region::Au => "en-US,en;q=0.9",
            Region::Uk => "en-GB,en;q=0.9",
            Region::In => "en-IN,en;q=0.9,hi;q=0.8",
            Region::De => "de-DE,de;q=0.9,en;q=0.8",
            Region::Fr => "fr-FR,fr;q=0.9,en;q=0.8",
            Region::Es => "es-ES,es;q=0.9,en;q=0.8",
            Region::It => "it-IT,it;q=0.9,en;q=0.8",
            Region::Jp => "ja-JP,ja;q=0.9,en;q=0.8",
        }
    }

    /// Continental storefronts write `1.234,56`.
    pub fn uses_comma_decimal(&self) -> bool {
        matches!(self, Region::De | Region::Fr | Region::Es | Region::It)
    }

    pub fn all() -> &'static [Region] {
        &Self::ALL
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Region::Us => "us",
            Region::Uk => "uk",
            Region::Ca => "ca",
            Region::Au => "au",
            Region::In => "in",
            Region::De => "de",
            Region::Fr => "fr",
            Region::Es => "es",
            Region::It => "it",
            Region::Jp => "jp",
        };
        f.write_str(code)
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        // "gb" is what most people type for the UK store
        let wanted = if wanted == "gb" { "uk".to_string() } else { wanted };

        Self::ALL.iter().copied().find(|r| r.to_string() == wanted).ok_or_else(|| {
            let codes: Vec<String> = Self::ALL.iter().map(|r| r.to_string()).collect();
            format!("Unknown region: {}. Use one of: {}", s, codes.join(", "))
        })
    }
}
