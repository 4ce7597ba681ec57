//! Output formatting for product records (table, JSON, markdown, CSV, Excel).

pub mod xlsx;

use crate::amazon::ProductRecord;
use crate::config::OutputFormat;
use anyhow::{Context, Result};

pub use xlsx::write_xlsx;

/// Header used for CSV and Excel output, in record field order.
pub const CSV_HEADER: [&str; 8] =
    ["title", "author", "price_raw", "price", "rating_raw", "rating", "link", "asin"];

/// Formats records for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a list of records.
    pub fn format_records(&self, records: &[ProductRecord]) -> Result<String> {
        if records.is_empty() {
            return match self.format {
                OutputFormat::Json => Ok("[]".to_string()),
                OutputFormat::Csv => Ok(CSV_HEADER.join(",")),
                OutputFormat::Xlsx => Err(xlsx_needs_file()),
                _ => Ok("No products found.".to_string()),
            };
        }

        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(records).context("Failed to serialize records")
            }
            OutputFormat::Table => Ok(self.table(records)),
            OutputFormat::Markdown => Ok(self.markdown(records)),
            OutputFormat::Csv => self.csv(records),
            OutputFormat::Xlsx => Err(xlsx_needs_file()),
        }
    }

    // Table formatting

    fn table(&self, records: &[ProductRecord]) -> String {
        let index_width = records.len().to_string().len().max(2);
        let price_width = 10;
        let rating_width = 6;
        let author_width = 20;
        let title_width = 60;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:>index_width$}  {:>price_width$}  {:>rating_width$}  {:<author_width$}  {}",
            "#", "Price", "Rating", "Author", "Title"
        ));
        lines.push(format!(
            "{:-<index_width$}  {:-<price_width$}  {:-<rating_width$}  {:-<author_width$}  {:-<title_width$}",
            "", "", "", "", ""
        ));

        for (i, record) in records.iter().enumerate() {
            let author = record.seller_or_author.as_deref().unwrap_or("-");

            lines.push(format!(
                "{:>index_width$}  {:>price_width$}  {:>rating_width$}  {:<author_width$}  {}",
                i + 1,
                price_cell(record),
                rating_cell(record),
                truncate(author, author_width),
                truncate(record.display_title(), title_width)
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} products", records.len()));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown(&self, records: &[ProductRecord]) -> String {
        let mut lines = Vec::new();

        lines.push("| # | Price | Rating | Author | Title |".to_string());
        lines.push("|---|-------|--------|--------|-------|".to_string());

        for (i, record) in records.iter().enumerate() {
            let title = md_escape(&truncate(record.display_title(), 60));
            let title = match &record.link {
                Some(link) => format!("[{}]({})", title, link),
                None => title,
            };
            let author = record.seller_or_author.as_deref().map(md_escape).unwrap_or_default();

            lines.push(format!(
                "| {} | {} | {} | {} | {} |",
                i + 1,
                price_cell(record),
                rating_cell(record),
                author,
                title
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} products found*", records.len()));

        lines.join("\n")
    }

    // CSV formatting

    fn csv(&self, records: &[ProductRecord]) -> Result<String> {
        let mut writer = csv::Writer::from_writer(vec![]);
        for record in records {
            writer.serialize(record).context("Failed to write CSV row")?;
        }

        let bytes = writer.into_inner().context("Failed to flush CSV output")?;
        let out = String::from_utf8(bytes).context("CSV output was not UTF-8")?;
        Ok(out.trim_end_matches(['\r', '\n']).to_string())
    }
}

fn xlsx_needs_file() -> anyhow::Error {
    anyhow::anyhow!("Excel output can only be written to a file; pass --output FILE.xlsx")
}

fn price_cell(record: &ProductRecord) -> String {
    record.price.map(|p| format!("{:.2}", p)).unwrap_or_else(|| "N/A".to_string())
}

fn rating_cell(record: &ProductRecord) -> String {
    record.rating.map(|r| format!("{:.1}", r)).unwrap_or_else(|| "N/A".to_string())
}

/// Shortens `text` to at most `max` chars, marking the cut with "...".
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

fn md_escape(text: &str) -> String {
    text.replace('|', "\\|")
}
