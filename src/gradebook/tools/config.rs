use std::path::PathBuf;

/// Default file name of the merged workbook.
pub const DEFAULT_OUTPUT: &str = "学生成绩汇总表.xlsx";

/// Selects files by a case-sensitive marker in their name and, optionally, a
/// required extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRule {
    pub marker: String,
    /// Lower-case extension without the dot. `None` accepts any spreadsheet.
    pub extension: Option<String>,
}

impl FileRule {
    pub fn new(marker: &str, extension: Option<&str>) -> Self {
        Self {
            marker: marker.to_string(),
            extension: extension.map(str::to_string),
        }
    }
}

/// A score category where each file becomes its own output column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedCategory {
    pub rule: FileRule,
    /// Substring identifying the score column in each file.
    pub score_keyword: String,
}

/// A score category read from one fixed column into one output column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateCategory {
    pub rule: FileRule,
    /// Exact label of the source column.
    pub source_column: String,
    /// Label of the merged output column.
    pub output_column: String,
}

/// Every tunable of a summary run. There is no configuration file; the CLI
/// only overrides the directories and output paths.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryConfig {
    pub data_dir: PathBuf,
    pub output: PathBuf,
    pub header_scan_rows: usize,
    pub identifier_scan_rows: usize,
    pub min_header_fields: usize,
    pub roster: FileRule,
    pub keyed: Vec<KeyedCategory>,
    pub aggregate: AggregateCategory,
    /// Label of the identifier column in score tables.
    pub identifier_column: String,
    /// Value written for a student with no score in a column.
    pub missing_score: f64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            output: PathBuf::from(DEFAULT_OUTPUT),
            header_scan_rows: 20,
            identifier_scan_rows: 30,
            min_header_fields: 2,
            roster: FileRule::new("CL", Some("xls")),
            keyed: vec![
                KeyedCategory {
                    rule: FileRule::new("SA", Some("xls")),
                    score_keyword: "得分".to_string(),
                },
                KeyedCategory {
                    rule: FileRule::new("LA", Some("xls")),
                    score_keyword: "得分".to_string(),
                },
            ],
            aggregate: AggregateCategory {
                rule: FileRule::new("TL", None),
                source_column: "讨论/".to_string(),
                output_column: "TL讨论".to_string(),
            },
            identifier_column: "学号".to_string(),
            missing_score: 0.0,
        }
    }
}

impl SummaryConfig {
    /// Default configuration rooted at `data_dir`.
    pub fn for_directory(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }
}
