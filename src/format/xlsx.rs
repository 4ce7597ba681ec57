//! Excel workbook export.

use super::CSV_HEADER;
use crate::amazon::ProductRecord;
use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;
use tracing::debug;

const SHEET_NAME: &str = "Products";

/// Writes `records` to an `.xlsx` workbook with one row per record.
///
/// Columns follow [`CSV_HEADER`]; prices and ratings are stored as numbers.
pub fn write_xlsx(records: &[ProductRecord], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    fill_sheet(worksheet, records).context("Failed to build Excel worksheet")?;

    workbook
        .save(path)
        .with_context(|| format!("Failed to write Excel file: {}", path.display()))?;

    debug!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

fn fill_sheet(worksheet: &mut Worksheet, records: &[ProductRecord]) -> Result<(), XlsxError> {
    worksheet.set_name(SHEET_NAME)?;

    let bold = Format::new().set_bold();
    for (col, name) in CSV_HEADER.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &bold)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;

        let text_cells = [
            (0, &record.title),
            (1, &record.seller_or_author),
            (2, &record.price_raw),
            (4, &record.rating_raw),
            (6, &record.link),
            (7, &record.asin),
        ];
        for (col, value) in text_cells {
            if let Some(text) = value {
                worksheet.write_string(row, col, text)?;
            }
        }

        if let Some(price) = record.price {
            worksheet.write_number(row, 3, price)?;
        }
        if let Some(rating) = record.rating {
            worksheet.write_number(row, 5, f64::from(rating))?;
        }
    }

    worksheet.set_freeze_panes(1, 0)?;
    worksheet.autofit();
    Ok(())
}
