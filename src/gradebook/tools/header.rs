//! Locates the header row of a roster sheet.
//!
//! Roster exports do not share a layout: titles, blank lines and notes may
//! precede the real header, and the column labels vary between Chinese and
//! English. A row is taken as the header when its cells name enough distinct
//! fields.

use tracing::debug;

use crate::gradebook::tools::model::{HeaderField, HeaderMapping, RawGrid};

const IDENTIFIER_KEYWORDS: &[&str] = &["学号", "student", "id"];
const NAME_KEYWORDS: &[&str] = &["姓名", "name", "名字"];
const CLASS_KEYWORDS: &[&str] = &["班级", "class", "专业"];
const GENDER_KEYWORDS: &[&str] = &["性别", "gender", "男女"];
const SEQUENCE_KEYWORDS: &[&str] = &["序号", "no", "编号"];

/// Header row of a roster grid together with the columns it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMatch {
    /// Zero-based row index within the grid.
    pub row: usize,
    pub mapping: HeaderMapping,
}

/// Lower-case keywords that mark a header cell as naming `field`.
pub fn keywords(field: HeaderField) -> &'static [&'static str] {
    match field {
        HeaderField::Identifier => IDENTIFIER_KEYWORDS,
        HeaderField::Name => NAME_KEYWORDS,
        HeaderField::Class => CLASS_KEYWORDS,
        HeaderField::Gender => GENDER_KEYWORDS,
        HeaderField::Sequence => SEQUENCE_KEYWORDS,
    }
}

/// Field named by a header cell, if any. A cell names at most one field;
/// fields are tried in [`HeaderField::PRIORITY`] order.
pub fn classify(text: &str) -> Option<HeaderField> {
    let normalized = text.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }
    HeaderField::PRIORITY.into_iter().find(|field| {
        keywords(*field)
            .iter()
            .any(|keyword| normalized.contains(keyword))
    })
}

/// Returns `true` when the cell text looks like an identifier column label.
pub fn is_identifier_label(text: &str) -> bool {
    classify(text) == Some(HeaderField::Identifier)
}

/// Scans the first `scan_rows` rows and returns the first one naming at least
/// `min_fields` distinct fields. When several cells of the row name the same
/// field, the rightmost one wins.
pub fn locate_header(grid: &RawGrid, scan_rows: usize, min_fields: usize) -> Option<HeaderMatch> {
    for (row_idx, row) in grid.rows().iter().take(scan_rows).enumerate() {
        let mut mapping = HeaderMapping::default();
        for (col_idx, cell) in row.iter().enumerate() {
            if let Some(field) = classify(&cell.text()) {
                mapping.insert(field, col_idx);
            }
        }

        if mapping.len() >= min_fields.max(1) {
            debug!(
                row = row_idx + 1,
                fields = ?mapping.fields().collect::<Vec<_>>(),
                "header row located"
            );
            return Some(HeaderMatch {
                row: row_idx,
                mapping,
            });
        }
    }
    None
}

/// Finds the first cell, scanning row by row and left to right within the
/// first `scan_rows` rows, that labels the identifier column. Returns its
/// `(row, column)`.
pub fn locate_identifier_anchor(grid: &RawGrid, scan_rows: usize) -> Option<(usize, usize)> {
    grid.rows()
        .iter()
        .take(scan_rows)
        .enumerate()
        .find_map(|(row_idx, row)| {
            row.iter()
                .position(|cell| is_identifier_label(&cell.text()))
                .map(|col_idx| (row_idx, col_idx))
        })
}
