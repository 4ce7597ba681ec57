//! CSS selectors for search-results markup.
//!
//! Every assumption about the storefront's HTML lives here. When the site
//! changes its layout, capture a page, update these selectors, and refresh
//! `tests/fixtures/search_result.html`.

use scraper::Selector;
use std::sync::LazyLock;

/// Locating listing blocks on a results page, in order of preference.
pub mod blocks {
    use super::*;

    /// Stable search-result card.
    pub static SEARCH_RESULT: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("[data-component-type='s-search-result']").unwrap());

    /// Older layout: generic section container with exactly these classes.
    pub static SECTION: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div[class='a-section a-spacing-medium']").unwrap());

    /// Last resort: any div carrying an ASIN (empty values are filtered in code).
    pub static ASIN_DIV: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div[data-asin]").unwrap());

    pub static ASIN_ATTR: &str = "data-asin";
}

/// Field selectors, evaluated inside one listing block.
pub mod listing {
    use super::*;

    /// Title span inside the heading.
    pub static TITLE_SPAN: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("h2 span").unwrap());

    /// Heading itself, when it has no span.
    pub static TITLE_HEADING: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h2").unwrap());

    /// Title link used by some layouts instead of a heading.
    pub static TITLE_LINK: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("a.a-link-normal.a-text-normal").unwrap());

    /// First link in the block.
    pub static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

    /// Screen-reader price text, e.g. "$29.99".
    pub static PRICE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".a-price .a-offscreen").unwrap());

    pub static PRICE_FALLBACK: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("span.a-color-base").unwrap());

    /// Star rating text, e.g. "4.5 out of 5 stars".
    pub static RATING: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("span.a-icon-alt").unwrap());

    pub static ARIA_LABEL: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("[aria-label]").unwrap());

    /// Marker that an aria-label carries a star rating.
    pub static RATING_LABEL_MARKER: &str = "out of 5 stars";

    /// Byline row holding the author or seller.
    pub static BYLINE_ROW: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse("div[class='a-row a-size-base a-color-secondary']").unwrap()
    });

    pub static BYLINE_ROW_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

    pub static SPAN: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span").unwrap());

    /// Lowercased marker for a free-standing byline span.
    pub static BYLINE_MARKER: &str = "by ";
}

/// Pages served instead of results when the site is blocking us.
pub mod errors {
    use super::*;

    /// CAPTCHA form.
    pub static CAPTCHA: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "form[action*='validateCaptcha'], \
             img[src*='captcha']",
        )
        .unwrap()
    });

    /// Dog page (the storefront's 503 error page).
    pub static DOG_PAGE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "img[alt*='Dogs of Amazon'], \
             a[href='/ref=cs_503_link']",
        )
        .unwrap()
    });
}
