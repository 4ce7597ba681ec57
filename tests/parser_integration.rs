//! Integration tests for the listing parser using fixture files.

use listing_harvest::amazon::parser::{detect_block_page, BlockPage, ListingParser};
use listing_harvest::amazon::regions::Region;

const SEARCH_FIXTURE: &str = include_str!("fixtures/search_result.html");

#[test]
fn test_parse_search_results() {
    let parser = ListingParser::new(Region::Us);
    let records = parser.parse_page(SEARCH_FIXTURE);

    // One record per card, including the one without an ASIN
    assert_eq!(records.len(), 4);

    // Full listing
    let product = &records[0];
    assert_eq!(product.asin.as_deref(), Some("B08N5WRWNW"));
    assert_eq!(
        product.title.as_deref(),
        Some("Logitech MX Master 3S Performance Wireless Mouse")
    );
    assert_eq!(product.seller_or_author.as_deref(), Some("Logitech"));
    assert_eq!(product.price_raw.as_deref(), Some("$99.99"));
    assert_eq!(product.price, Some(99.99));
    assert_eq!(product.rating_raw.as_deref(), Some("4.7 out of 5 stars"));
    assert_eq!(product.rating, Some(4.7));
    assert_eq!(
        product.link.as_deref(),
        Some("https://www.amazon.com/Logitech-Master-Performance-Ultra-fast-Scrolling/dp/B08N5WRWNW/ref=sr_1_1")
    );

    // Sponsored listing: rating from aria-label, price range
    let product = &records[1];
    assert_eq!(product.asin.as_deref(), Some("B09HMZ6S1Y"));
    assert!(product.title.as_deref().unwrap().starts_with("Razer Basilisk V3"));
    assert_eq!(product.seller_or_author, None);
    assert_eq!(product.price, Some(39.99));
    assert_eq!(product.rating, Some(4.3));
    assert!(product.link.as_deref().unwrap().starts_with("https://www.amazon.com/sspa/click?"));
}

#[test]
fn test_parse_book_listing() {
    let parser = ListingParser::new(Region::Us);
    let records = parser.parse_page(SEARCH_FIXTURE);

    let book = &records[2];
    assert_eq!(book.title.as_deref(), Some("Dune (Deluxe Edition)"));
    assert_eq!(book.seller_or_author.as_deref(), Some("Frank Herbert"));
    assert_eq!(book.price, None);
    assert_eq!(book.rating, None);
    assert_eq!(
        book.link.as_deref(),
        Some("https://www.amazon.com/Dune-Frank-Herbert/dp/0441172717")
    );
}

#[test]
fn test_parse_listing_without_asin() {
    let parser = ListingParser::new(Region::Us);
    let records = parser.parse_page(SEARCH_FIXTURE);

    let mystery = &records[3];
    assert_eq!(mystery.asin, None);
    assert_eq!(mystery.title.as_deref(), Some("Mystery Listing Without Identifier"));
    assert_eq!(mystery.link, None);
    assert!(!mystery.has_price());
}

#[test]
fn test_links_follow_region() {
    let parser = ListingParser::new(Region::Uk);
    let records = parser.parse_page(SEARCH_FIXTURE);

    assert!(records[0].link.as_deref().unwrap().starts_with("https://www.amazon.co.uk/"));
    // Absolute links are left alone
    assert!(records[2].link.as_deref().unwrap().starts_with("https://www.amazon.com/"));
}

#[test]
fn test_parse_empty_results() {
    let parser = ListingParser::new(Region::Us);
    let html = r#"
        <html>
        <body>
            <div class="s-no-search-results">No results found</div>
        </body>
        </html>
    "#;

    assert!(parser.parse_page(html).is_empty());
    assert!(parser.parse_page("").is_empty());
}

#[test]
fn test_parse_section_layout() {
    let parser = ListingParser::new(Region::Us);
    let html = r#"
        <html><body>
            <div class="a-section a-spacing-medium">
                <h2><a href="/dp/B0SECTION1"><span>Section Layout Kettle</span></a></h2>
                <span class="a-color-base">$24.00</span>
            </div>
            <div class="a-section a-spacing-medium">
                <h2><span>Section Layout Toaster</span></h2>
            </div>
        </body></html>
    "#;

    let records = parser.parse_page(html);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].title.as_deref(), Some("Section Layout Kettle"));
    assert_eq!(records[0].price, Some(24.0));
    assert_eq!(records[0].link.as_deref(), Some("https://www.amazon.com/dp/B0SECTION1"));
    assert_eq!(records[1].title.as_deref(), Some("Section Layout Toaster"));
}

#[test]
fn test_fixture_is_not_a_block_page() {
    assert_eq!(detect_block_page(SEARCH_FIXTURE), None);
}

#[test]
fn test_detect_captcha_page() {
    let html = r#"
        <html><body>
            <form method="get" action="/errors/validateCaptcha">
                <img src="https://images-na.ssl-images-amazon.com/captcha/abc/Captcha_xyz.jpg">
                <input type="text" id="captchacharacters">
            </form>
        </body></html>
    "#;

    assert_eq!(detect_block_page(html), Some(BlockPage::Captcha));
}
