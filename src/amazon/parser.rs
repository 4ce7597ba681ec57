//! HTML parser for search-results pages.

use crate::amazon::models::ProductRecord;
use crate::amazon::regions::Region;
use crate::amazon::selectors::{blocks, errors, listing};
use scraper::{ElementRef, Html};
use std::fmt;
use tracing::{debug, trace};

/// Kind of page served instead of search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockPage {
    Captcha,
    ErrorPage,
}

impl fmt::Display for BlockPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockPage::Captcha => f.write_str("CAPTCHA challenge"),
            BlockPage::ErrorPage => f.write_str("storefront error page (503)"),
        }
    }
}

/// Checks whether `html` is a CAPTCHA or error page rather than results.
///
/// A page that carries listing blocks is never a block page.
pub fn detect_block_page(html: &str) -> Option<BlockPage> {
    let document = Html::parse_document(html);

    if !listing_blocks(&document).is_empty() {
        return None;
    }
    if document.select(&errors::CAPTCHA).next().is_some() {
        return Some(BlockPage::Captcha);
    }
    if document.select(&errors::DOG_PAGE).next().is_some() {
        return Some(BlockPage::ErrorPage);
    }
    None
}

/// Turns one results page into product records.
pub struct ListingParser {
    region: Region,
}

impl ListingParser {
    pub fn new(region: Region) -> Self {
        Self { region }
    }

    /// Parses every listing block on the page.
    ///
    /// Returns one record per block, in page order. A page without listing
    /// blocks yields an empty vector, which the driver reads as the end of
    /// pagination.
    pub fn parse_page(&self, html: &str) -> Vec<ProductRecord> {
        let document = Html::parse_document(html);

        let records: Vec<ProductRecord> = listing_blocks(&document)
            .into_iter()
            .map(|block| {
                let record = self.parse_block(block);
                trace!("Parsed listing: {}", record.display_title());
                record
            })
            .collect();

        debug!("Parsed {} listings", records.len());
        records
    }

    fn parse_block(&self, block: ElementRef) -> ProductRecord {
        let price_raw = self.find_price_text(block);
        let price = price_raw.as_deref().and_then(|t| self.parse_price_value(t));

        let rating_raw = find_rating_text(block);
        let rating = rating_raw.as_deref().and_then(parse_stars);

        let asin = block
            .value()
            .attr(blocks::ASIN_ATTR)
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(String::from);

        ProductRecord {
            title: find_title(block),
            seller_or_author: find_byline(block),
            price,
            price_raw,
            rating,
            rating_raw,
            link: self.find_link(block),
            asin,
        }
    }

    fn find_link(&self, block: ElementRef) -> Option<String> {
        let href = block.select(&listing::LINK).next()?.value().attr("href")?.trim();
        if href.is_empty() {
            return None;
        }

        if href.starts_with("http") {
            Some(href.to_string())
        } else if href.starts_with('/') {
            Some(format!("{}{}", self.region.base_url(), href))
        } else {
            Some(format!("{}/{}", self.region.base_url(), href))
        }
    }

    fn find_price_text(&self, block: ElementRef) -> Option<String> {
        block
            .select(&listing::PRICE)
            .next()
            .and_then(element_text)
            .or_else(|| block.select(&listing::PRICE_FALLBACK).next().and_then(element_text))
    }

    /// Parses a price from text, honouring the region's decimal separator.
    fn parse_price_value(&self, text: &str) -> Option<f64> {
        let lower = text.to_lowercase();
        if lower.contains("see price") || lower.contains("cart") {
            return None;
        }

        let cleaned: String = text
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',' || *c == '-')
            .collect();

        // "$10 - $20" lists the lower bound first
        let first = cleaned.split('-').find(|part| part.chars().any(|c| c.is_ascii_digit()))?;

        self.parse_single_price(first)
    }

    fn parse_single_price(&self, text: &str) -> Option<f64> {
        let cleaned = text.trim().trim_matches(|c| c == '.' || c == ',');
        if cleaned.is_empty() {
            return None;
        }

        let normalized = if self.region.uses_comma_decimal() {
            cleaned.replace('.', "").replace(',', ".")
        } else {
            cleaned.replace(',', "")
        };

        normalized.parse().ok()
    }
}

/// Finds listing blocks using the first strategy that matches anything.
fn listing_blocks(document: &Html) -> Vec<ElementRef<'_>> {
    let cards: Vec<_> = document.select(&blocks::SEARCH_RESULT).collect();
    if !cards.is_empty() {
        return cards;
    }

    let sections: Vec<_> = document.select(&blocks::SECTION).collect();
    if !sections.is_empty() {
        debug!("No search-result cards, using section containers");
        return sections;
    }

    document
        .select(&blocks::ASIN_DIV)
        .filter(|e| e.value().attr(blocks::ASIN_ATTR).is_some_and(|a| !a.trim().is_empty()))
        .collect()
}

/// Trimmed text of an element with inner whitespace runs collapsed.
fn element_text(element: ElementRef) -> Option<String> {
    let text = element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");

    (!text.is_empty()).then_some(text)
}

fn find_title(block: ElementRef) -> Option<String> {
    if let Some(heading) = block.select(&listing::TITLE_HEADING).next() {
        let title = heading
            .select(&listing::TITLE_SPAN)
            .next()
            .and_then(element_text)
            .or_else(|| element_text(heading));
        if title.is_some() {
            return title;
        }
    }

    block.select(&listing::TITLE_LINK).next().and_then(element_text)
}

fn find_rating_text(block: ElementRef) -> Option<String> {
    if let Some(alt) = block.select(&listing::RATING).next() {
        return element_text(alt);
    }

    block
        .select(&listing::ARIA_LABEL)
        .filter_map(|e| e.value().attr("aria-label"))
        .find(|label| label.contains(listing::RATING_LABEL_MARKER))
        .map(|label| label.trim().to_string())
}

/// Extracts the star value from text like "4.5 out of 5 stars" or "4,5 von 5".
fn parse_stars(text: &str) -> Option<f32> {
    text.split_whitespace()
        .find_map(|token| token.replace(',', ".").parse::<f32>().ok())
        .filter(|stars| (0.0..=5.0).contains(stars))
}

fn find_byline(block: ElementRef) -> Option<String> {
    let from_row = block.select(&listing::BYLINE_ROW).next().and_then(|row| {
        row.select(&listing::BYLINE_ROW_LINK)
            .next()
            .and_then(element_text)
            .or_else(|| element_text(row))
            .and_then(|text| strip_by(&text))
    });

    from_row.or_else(|| {
        block.select(&listing::SPAN).find_map(|span| {
            let own = own_text(span);
            if own.to_lowercase().contains(listing::BYLINE_MARKER) {
                strip_by(&own)
            } else {
                None
            }
        })
    })
}

/// Drops a leading "by " from a byline; empty results become `None`.
fn strip_by(byline: &str) -> Option<String> {
    let stripped = byline
        .strip_prefix("by ")
        .or_else(|| byline.strip_prefix("By "))
        .unwrap_or(byline)
        .trim();

    (!stripped.is_empty() && !stripped.eq_ignore_ascii_case("by")).then(|| stripped.to_string())
}

/// Text of the element's direct text children only.
fn own_text(element: ElementRef) -> String {
    element
        .children()
        .filter_map(|child| child.value().as_text())
        .flat_map(|text| text.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}
