use tracing::debug;

use crate::gradebook::tools::error::{Result, ToolError};
use crate::gradebook::tools::model::{AggregateScores, KeyedScores, LabeledTable};

/// Records every score of a per-file-keyed table under `key`.
///
/// The score column is the first one whose label contains `score_keyword`;
/// a table without one contributes nothing. Rows missing either the
/// identifier or the score are skipped. Returns the number of scores recorded.
pub fn collect_keyed(
    table: &LabeledTable,
    identifier_column: &str,
    score_keyword: &str,
    key: &str,
    file: &str,
    scores: &mut KeyedScores,
) -> Result<usize> {
    let Some(score_idx) = table.find_column_containing(score_keyword) else {
        debug!(file, keyword = score_keyword, "no score column");
        return Ok(0);
    };
    let id_idx = require_column(table, identifier_column, file)?;

    let mut recorded = 0;
    for (identifier, value) in score_pairs(table, id_idx, score_idx) {
        scores.record(identifier, key, value);
        recorded += 1;
    }
    Ok(recorded)
}

/// Records the scores of `source_column` straight under each identifier.
/// A later table overwrites earlier values for the same identifier.
pub fn collect_aggregate(
    table: &LabeledTable,
    identifier_column: &str,
    source_column: &str,
    file: &str,
    scores: &mut AggregateScores,
) -> Result<usize> {
    let Some(score_idx) = table.column_index(source_column) else {
        debug!(file, column = source_column, "no aggregate column");
        return Ok(0);
    };
    let id_idx = require_column(table, identifier_column, file)?;

    let mut recorded = 0;
    for (identifier, value) in score_pairs(table, id_idx, score_idx) {
        scores.record(identifier, value);
        recorded += 1;
    }
    Ok(recorded)
}

fn require_column(table: &LabeledTable, column: &str, file: &str) -> Result<usize> {
    table
        .column_index(column)
        .ok_or_else(|| ToolError::MissingColumn {
            file: file.to_string(),
            column: column.to_string(),
        })
}

fn score_pairs(
    table: &LabeledTable,
    id_idx: usize,
    score_idx: usize,
) -> impl Iterator<Item = (String, f64)> + '_ {
    table.rows.iter().filter_map(move |row| {
        let identifier = table.value(row, id_idx);
        let score = table.value(row, score_idx);
        if identifier.is_missing() || score.is_missing() {
            return None;
        }
        match score.as_number() {
            Some(value) => Some((identifier.text(), value)),
            None => {
                debug!(identifier = %identifier, value = ?score, "non-numeric score ignored");
                None
            }
        }
    })
}
