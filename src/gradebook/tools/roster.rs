//! Extracts student records from roster grids.
//!
//! Two strategies exist. When a header row naming the identifier column was
//! found, the other attributes are read from their mapped columns. Otherwise
//! only an identifier label is searched for, and the remaining attributes are
//! guessed from the shape of the other cells in each row.

use tracing::{debug, info};

use crate::gradebook::tools::config::SummaryConfig;
use crate::gradebook::tools::header::{self, HeaderMatch};
use crate::gradebook::tools::model::{Cell, HeaderField, HeaderMapping, RawGrid, StudentRecord};

const NAME_EXCLUDED_KEYWORDS: &[&str] = &["class", "grade", "班", "级", "系", "院", "专业"];
const CLASS_KEYWORDS: &[&str] = &["T", "工商", "管理", "经济", "金融", "会计"];
const GENDER_VALUES: &[&str] = &["男", "女"];

/// Returns `true` when `value` looks like an enrollment number: at least 8
/// characters, at least one digit, and not a plain number once `.` and `-`
/// are removed.
pub fn is_valid_identifier(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        return false;
    }
    value.chars().count() >= 8
        && value.chars().any(|ch| ch.is_ascii_digit())
        && !is_digits(&value.replace(['.', '-'], ""))
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|ch| ch.is_ascii_digit())
}

/// How records are pulled out of one roster grid. Chosen once per file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// A header row with an identifier column was found.
    Mapped {
        header_row: usize,
        mapping: HeaderMapping,
    },
    /// Only an identifier label was found; other fields are inferred.
    Fallback { anchor_row: usize, column: usize },
    /// Nothing in the scanned window labels an identifier column.
    Unavailable,
}

impl ExtractionStrategy {
    /// Picks the strategy for `grid`.
    pub fn select(grid: &RawGrid, config: &SummaryConfig) -> Self {
        let located = header::locate_header(grid, config.header_scan_rows, config.min_header_fields);
        if let Some(HeaderMatch { row, mapping }) = located {
            if mapping.get(HeaderField::Identifier).is_some() {
                return ExtractionStrategy::Mapped {
                    header_row: row,
                    mapping,
                };
            }
        }

        match header::locate_identifier_anchor(grid, config.header_scan_rows) {
            Some((anchor_row, column)) => ExtractionStrategy::Fallback { anchor_row, column },
            None => ExtractionStrategy::Unavailable,
        }
    }

    /// Scans up to `scan_rows` rows below the header (or anchor) and returns
    /// one record per row holding a valid identifier.
    pub fn extract(&self, grid: &RawGrid, scan_rows: usize, source_file: &str) -> Vec<StudentRecord> {
        let (start, id_column) = match self {
            ExtractionStrategy::Mapped {
                header_row,
                mapping,
            } => match mapping.get(HeaderField::Identifier) {
                Some(column) => (header_row + 1, column),
                None => return Vec::new(),
            },
            ExtractionStrategy::Fallback { anchor_row, column } => (anchor_row + 1, *column),
            ExtractionStrategy::Unavailable => return Vec::new(),
        };

        let mut records = Vec::new();
        for row in grid.rows().iter().skip(start).take(scan_rows) {
            let identifier = cell_text(row, id_column);
            if !is_valid_identifier(&identifier) {
                continue;
            }

            let mut record = StudentRecord::new(identifier, source_file);
            match self {
                ExtractionStrategy::Mapped { mapping, .. } => fill_from_mapping(&mut record, row, mapping),
                ExtractionStrategy::Fallback { column, .. } => infer_from_row(&mut record, row, *column),
                ExtractionStrategy::Unavailable => {}
            }
            debug!(
                identifier = %record.identifier,
                name = %record.name,
                sequence = %record.original_sequence,
                class = %record.class_label,
                gender = %record.gender,
                "student found"
            );
            records.push(record);
        }
        records
    }
}

/// Extracts every student record from one roster grid.
pub fn extract_students(grid: &RawGrid, config: &SummaryConfig, source_file: &str) -> Vec<StudentRecord> {
    let strategy = ExtractionStrategy::select(grid, config);
    match &strategy {
        ExtractionStrategy::Mapped {
            header_row,
            mapping,
        } => info!(
            file = source_file,
            row = header_row + 1,
            fields = ?mapping.fields().collect::<Vec<_>>(),
            "header row found"
        ),
        ExtractionStrategy::Fallback { anchor_row, column } => info!(
            file = source_file,
            row = anchor_row + 1,
            column = column + 1,
            "no standard header; identifier column located by label"
        ),
        ExtractionStrategy::Unavailable => {
            info!(file = source_file, "no identifier column found; file skipped")
        }
    }
    strategy.extract(grid, config.identifier_scan_rows, source_file)
}

fn cell_text(row: &[Cell], column: usize) -> String {
    row.get(column).map(Cell::text).unwrap_or_default()
}

fn fill_from_mapping(record: &mut StudentRecord, row: &[Cell], mapping: &HeaderMapping) {
    let lookup = |field: HeaderField| {
        mapping
            .get(field)
            .map(|column| cell_text(row, column))
            .unwrap_or_default()
    };

    record.name = lookup(HeaderField::Name);
    record.class_label = lookup(HeaderField::Class);
    record.gender = lookup(HeaderField::Gender);

    let sequence = lookup(HeaderField::Sequence);
    if is_digits(&sequence) {
        record.original_sequence = sequence;
    }
}

fn infer_from_row(record: &mut StudentRecord, row: &[Cell], id_column: usize) {
    for (col_idx, cell) in row.iter().enumerate() {
        if col_idx == id_column || cell.is_missing() {
            continue;
        }
        let value = cell.text();

        if record.name.is_empty() && looks_like_name(&value) {
            record.name = value;
        } else if record.original_sequence.is_empty() && looks_like_sequence(&value) {
            record.original_sequence = value;
        } else if record.gender.is_empty() && GENDER_VALUES.contains(&value.as_str()) {
            record.gender = value;
        } else if record.class_label.is_empty() && looks_like_class(&value) {
            record.class_label = value;
        }
    }
}

fn looks_like_name(value: &str) -> bool {
    if is_valid_identifier(value) || is_digits(&value.replace('.', "")) {
        return false;
    }
    let length = value.chars().count();
    if !(2..=15).contains(&length) {
        return false;
    }
    let lowered = value.to_lowercase();
    !NAME_EXCLUDED_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

fn looks_like_sequence(value: &str) -> bool {
    is_digits(value) && value.chars().count() <= 3
}

fn looks_like_class(value: &str) -> bool {
    let length = value.chars().count();
    (3..=20).contains(&length) && CLASS_KEYWORDS.iter().any(|keyword| value.contains(keyword))
}
