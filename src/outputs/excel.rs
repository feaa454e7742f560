//! Spreadsheet export.
//!
//! Writes one sheet named `NYT` with a bold header row followed by one row
//! per article, columns in [`ArticleRow::HEADERS`] order.

use crate::errors::ExportError;
use crate::models::ArticleRow;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::{info, instrument};

pub const SHEET_NAME: &str = "NYT";
pub const FILE_NAME: &str = "articles.xlsx";

/// Write `rows` to a new workbook at `path`, replacing any existing file.
#[instrument(level = "info", skip_all, fields(path = %path.display(), rows = rows.len()))]
pub fn export_articles(rows: &[ArticleRow], path: &Path) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header = Format::new().set_bold();
    for (col, title) in ArticleRow::HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &header)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        worksheet.write_string(r, 0, row.date.as_str())?;
        worksheet.write_string(r, 1, row.title.as_str())?;
        worksheet.write_number(r, 2, row.search_phrases_count as f64)?;
        worksheet.write_string(r, 3, row.description.as_str())?;
        worksheet.write_boolean(r, 4, row.contains_money)?;
        worksheet.write_string(r, 5, row.picture_filename.as_str())?;
    }

    workbook.save(path)?;
    info!("Exported articles to spreadsheet");
    Ok(())
}
