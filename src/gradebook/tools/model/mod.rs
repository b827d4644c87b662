use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Enrollment number used as the join key between roster and score files.
pub type StudentId = String;

/// Represents a single spreadsheet cell after it has been lifted out of the
/// reader backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Text content, kept as read.
    Text(String),
    /// Any numeric content, including integers stored as floats.
    Number(f64),
    /// Boolean literal.
    Bool(bool),
    /// Spreadsheet error value such as `#N/A`.
    Error,
    /// No value at all.
    Empty,
}

impl Cell {
    /// Returns `true` when the cell carries no usable value.
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Empty | Cell::Error => true,
            Cell::Number(value) => value.is_nan(),
            Cell::Text(value) => {
                let trimmed = value.trim();
                trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan")
            }
            Cell::Bool(_) => false,
        }
    }

    /// Renders the cell as trimmed text. Missing cells render as an empty
    /// string.
    pub fn text(&self) -> String {
        if self.is_missing() {
            return String::new();
        }
        match self {
            Cell::Text(value) => value.trim().to_string(),
            Cell::Number(value) => format_number(*value),
            Cell::Bool(value) => value.to_string(),
            Cell::Error | Cell::Empty => String::new(),
        }
    }

    /// Interprets the cell as a number, accepting numeric text.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(value) if !value.is_nan() => Some(*value),
            Cell::Text(value) => value.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// Formats whole-valued floats without a fractional part so that numeric
/// cells compare like the text a user typed.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Ordered rows of cells exactly as they appear in the first worksheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGrid {
    rows: Vec<Vec<Cell>>,
}

impl RawGrid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Builds a grid from plain strings, mostly useful for fixtures. Empty
    /// strings become [`Cell::Empty`].
    pub fn from_text<S: AsRef<str>>(rows: &[Vec<S>]) -> Self {
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|value| match value.as_ref() {
                        "" => Cell::Empty,
                        text => Cell::Text(text.to_string()),
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|cells| cells.get(column))
    }
}

/// A table whose first row has been promoted to column labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl LabeledTable {
    /// Promotes the first row of the grid to column labels.
    pub fn from_grid(grid: RawGrid) -> Self {
        let mut rows = grid.rows.into_iter();
        let columns = rows
            .next()
            .map(|header| header.iter().map(Cell::text).collect())
            .unwrap_or_default();
        Self {
            columns,
            rows: rows.collect(),
        }
    }

    /// Index of the column whose label equals `name` exactly.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Index of the first column whose label contains `keyword`.
    pub fn find_column_containing(&self, keyword: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.contains(keyword))
    }

    pub fn value(&self, row: &[Cell], column: usize) -> Cell {
        row.get(column).cloned().unwrap_or(Cell::Empty)
    }
}

/// Semantic roles a roster column can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeaderField {
    Identifier,
    Name,
    Class,
    Gender,
    Sequence,
}

impl HeaderField {
    /// Fields in the order a header cell is tested against them.
    pub const PRIORITY: [HeaderField; 5] = [
        HeaderField::Identifier,
        HeaderField::Name,
        HeaderField::Class,
        HeaderField::Gender,
        HeaderField::Sequence,
    ];
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HeaderField::Identifier => "学号",
            HeaderField::Name => "姓名",
            HeaderField::Class => "班级",
            HeaderField::Gender => "性别",
            HeaderField::Sequence => "序号",
        };
        f.write_str(label)
    }
}

/// Field → column index mapping, valid only for the grid it was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMapping {
    columns: BTreeMap<HeaderField, usize>,
}

impl HeaderMapping {
    pub fn insert(&mut self, field: HeaderField, column: usize) {
        self.columns.insert(field, column);
    }

    pub fn get(&self, field: HeaderField) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = HeaderField> + '_ {
        self.columns.keys().copied()
    }
}

/// One student as found in a roster file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub identifier: StudentId,
    pub name: String,
    pub original_sequence: String,
    pub class_label: String,
    pub gender: String,
    pub source_file: String,
}

impl StudentRecord {
    pub fn new(identifier: impl Into<StudentId>, source_file: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            source_file: source_file.into(),
            ..Self::default()
        }
    }
}

/// Scores of a category where every source file contributes its own column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyedScores {
    /// Filename marker of the category, e.g. `SA`.
    pub category: String,
    /// Identifier → (category key → value).
    pub scores: BTreeMap<StudentId, BTreeMap<String, f64>>,
}

impl KeyedScores {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            scores: BTreeMap::new(),
        }
    }

    pub fn record(&mut self, identifier: StudentId, key: &str, value: f64) {
        self.scores
            .entry(identifier)
            .or_default()
            .insert(key.to_string(), value);
    }

    pub fn get(&self, identifier: &str, key: &str) -> Option<f64> {
        self.scores
            .get(identifier)
            .and_then(|by_key| by_key.get(key))
            .copied()
    }

    /// Sorted union of all category keys seen so far.
    pub fn keys(&self) -> Vec<String> {
        let keys: BTreeSet<&String> = self.scores.values().flat_map(BTreeMap::keys).collect();
        keys.into_iter().cloned().collect()
    }

    pub fn student_count(&self) -> usize {
        self.scores.len()
    }
}

/// Scores of a category that maps straight from identifier to one value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateScores {
    /// Output column name, e.g. `TL讨论`.
    pub column: String,
    pub scores: HashMap<StudentId, f64>,
}

impl AggregateScores {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            scores: HashMap::new(),
        }
    }

    /// Later writes for the same identifier replace earlier ones.
    pub fn record(&mut self, identifier: StudentId, value: f64) {
        self.scores.insert(identifier, value);
    }

    pub fn get(&self, identifier: &str) -> Option<f64> {
        self.scores.get(identifier).copied()
    }

    pub fn student_count(&self) -> usize {
        self.scores.len()
    }
}

/// One merged output row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    /// Fresh 1-based position in the output.
    pub sequence: usize,
    pub student: StudentRecord,
    /// One value per score column, aligned with [`SummaryTable::score_columns`].
    pub scores: Vec<f64>,
}

/// The merged students × score-categories table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryTable {
    pub score_columns: Vec<String>,
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    /// Identity and attribute columns that precede the score columns.
    pub const IDENTITY_COLUMNS: [&'static str; 7] =
        ["序号", "原序号", "学号", "姓名", "班级", "性别", "来源文件"];

    /// Full ordered header of the output table.
    pub fn columns(&self) -> Vec<String> {
        Self::IDENTITY_COLUMNS
            .iter()
            .map(|column| column.to_string())
            .chain(self.score_columns.iter().cloned())
            .collect()
    }

    pub fn score_column_index(&self, column: &str) -> Option<usize> {
        self.score_columns.iter().position(|name| name == column)
    }

    pub fn row_for(&self, identifier: &str) -> Option<&SummaryRow> {
        self.rows
            .iter()
            .find(|row| row.student.identifier == identifier)
    }

    /// Score of `identifier` in `column`, taken from the first matching row.
    pub fn score(&self, identifier: &str, column: &str) -> Option<f64> {
        let index = self.score_column_index(column)?;
        self.row_for(identifier)
            .and_then(|row| row.scores.get(index))
            .copied()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl SummaryRow {
    /// Text of the identity columns in [`SummaryTable::IDENTITY_COLUMNS`] order.
    pub fn identity_cells(&self) -> [String; 7] {
        [
            self.sequence.to_string(),
            self.student.original_sequence.clone(),
            self.student.identifier.clone(),
            self.student.name.clone(),
            self.student.class_label.clone(),
            self.student.gender.clone(),
            self.student.source_file.clone(),
        ]
    }
}
