use std::path::Path;

use calamine::{DataType, Range, Reader, Xls, Xlsx, open_workbook};
use tracing::debug;

use crate::gradebook::tools::error::{Result, ToolError};
use crate::gradebook::tools::io::discover;
use crate::gradebook::tools::model::{Cell, LabeledTable, RawGrid};

/// Decoder used to open a workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Office Open XML reader.
    Ooxml,
    /// BIFF reader for legacy `.xls` workbooks.
    Legacy,
}

/// Backends tried for `path`, in order. `.xls` exports are frequently OOXML
/// files with the wrong extension, so the OOXML reader is tried first.
pub fn backends_for(path: &Path) -> &'static [Backend] {
    match discover::extension(path).as_deref() {
        Some("xls") => &[Backend::Ooxml, Backend::Legacy],
        _ => &[Backend::Ooxml],
    }
}

/// Reads the first worksheet of `path` as a raw grid, trying each backend in
/// turn. The error of the last backend is returned when all of them fail.
pub fn read_grid(path: &Path) -> Result<RawGrid> {
    let backends = backends_for(path);
    let mut last_error = None;

    for backend in backends {
        match load_range(path, *backend) {
            Ok(range) => return Ok(range_to_grid(&range)),
            Err(error) => {
                debug!(file = %path.display(), ?backend, %error, "backend failed");
                last_error = Some(error);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        ToolError::InvalidWorkbook(format!("no reader for {}", path.display()))
    }))
}

/// Reads the first worksheet of `path` and promotes its first row to column
/// labels.
pub fn read_table(path: &Path) -> Result<LabeledTable> {
    Ok(LabeledTable::from_grid(read_grid(path)?))
}

fn load_range(path: &Path, backend: Backend) -> Result<Range<DataType>> {
    match backend {
        Backend::Ooxml => {
            let mut workbook: Xlsx<_> = open_workbook(path)?;
            let name = first_sheet_name(workbook.sheet_names().first(), path)?;
            let range_result = workbook
                .worksheet_range(&name)
                .ok_or_else(|| missing_sheet(path, &name))?;
            Ok(range_result?)
        }
        Backend::Legacy => {
            let mut workbook: Xls<_> = open_workbook(path)?;
            let name = first_sheet_name(workbook.sheet_names().first(), path)?;
            let range_result = workbook
                .worksheet_range(&name)
                .ok_or_else(|| missing_sheet(path, &name))?;
            Ok(range_result?)
        }
    }
}

fn first_sheet_name(name: Option<&String>, path: &Path) -> Result<String> {
    name.cloned()
        .ok_or_else(|| ToolError::InvalidWorkbook(format!("no worksheet in {}", path.display())))
}

fn missing_sheet(path: &Path, name: &str) -> ToolError {
    ToolError::InvalidWorkbook(format!("missing sheet '{name}' in {}", path.display()))
}

fn range_to_grid(range: &Range<DataType>) -> RawGrid {
    let rows = range
        .rows()
        .map(|row| row.iter().map(to_cell).collect())
        .collect();
    RawGrid::new(rows)
}

fn to_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::String(value) => Cell::Text(value.clone()),
        DataType::Float(value) => Cell::Number(*value),
        DataType::Int(value) => Cell::Number(*value as f64),
        DataType::Bool(value) => Cell::Bool(*value),
        DataType::Error(_) => Cell::Error,
        DataType::Empty => Cell::Empty,
        other => Cell::Text(other.to_string()),
    }
}
