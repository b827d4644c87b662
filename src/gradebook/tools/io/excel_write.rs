use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use crate::gradebook::tools::error::Result;
use crate::gradebook::tools::model::SummaryTable;

/// Name of the single worksheet in the merged workbook.
pub const SUMMARY_SHEET: &str = "Summary";

/// Writes the merged table to `path`: one header row followed by one row per
/// student. Identity columns are written as text, the output sequence and
/// score columns as numbers.
pub fn write_summary(path: &Path, table: &SummaryTable) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SUMMARY_SHEET)?;

    let header_format = Format::new().set_bold();
    let columns = table.columns();
    for (col_idx, header) in columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col_idx as u16, header, &header_format)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let excel_row = (row_idx + 1) as u32;
        for (col_idx, cell) in row.identity_cells().iter().enumerate() {
            if col_idx == 0 {
                worksheet.write_number(excel_row, 0, row.sequence as f64)?;
            } else if !cell.is_empty() {
                worksheet.write_string(excel_row, col_idx as u16, cell)?;
            }
        }

        let offset = SummaryTable::IDENTITY_COLUMNS.len();
        for (score_idx, score) in row.scores.iter().enumerate() {
            worksheet.write_number(excel_row, (offset + score_idx) as u16, *score)?;
        }
    }

    let col_end = (columns.len() as u16).saturating_sub(1);
    let row_end = table.rows.len() as u32;
    worksheet.autofilter(0, 0, row_end, col_end)?;
    worksheet.set_freeze_panes(1, 0)?;

    workbook.save(path)?;
    Ok(())
}
