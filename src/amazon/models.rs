//! Listing record produced by the parser.

use serde::{Deserialize, Serialize};

/// One product as it appeared in a search-results page.
///
/// Every field is best-effort: a listing that lacks a price, rating or byline
/// still produces a record with that field set to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product title
    pub title: Option<String>,
    /// Seller, brand or author byline
    #[serde(rename = "author")]
    pub seller_or_author: Option<String>,
    /// Price text as shown on the page
    pub price_raw: Option<String>,
    /// Parsed price in the storefront's currency
    pub price: Option<f64>,
    /// Rating text as shown on the page, e.g. "4.5 out of 5 stars"
    pub rating_raw: Option<String>,
    /// Star rating (0.0 - 5.0)
    pub rating: Option<f32>,
    /// Absolute product URL
    pub link: Option<String>,
    /// Amazon Standard Identification Number
    pub asin: Option<String>,
}

impl ProductRecord {
    /// Title for display; listings without one show as "Untitled".
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }

    pub fn has_price(&self) -> bool {
        self.price.is_some()
    }

    pub fn has_rating(&self) -> bool {
        self.rating.is_some()
    }
}
