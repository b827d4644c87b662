use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::gradebook::tools::config::{AggregateCategory, KeyedCategory, SummaryConfig};
use crate::gradebook::tools::error::Result;
use crate::gradebook::tools::io::{discover, excel_read, excel_write};
use crate::gradebook::tools::merge::merge;
use crate::gradebook::tools::model::{AggregateScores, KeyedScores, StudentRecord, SummaryTable};
use crate::gradebook::tools::report::{self, SummaryStats};
use crate::gradebook::tools::roster;
use crate::gradebook::tools::scores;

/// Everything gathered from one directory before merging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    pub roster: Vec<StudentRecord>,
    pub keyed: Vec<KeyedScores>,
    pub aggregate: AggregateScores,
}

/// Result of a full run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub table: SummaryTable,
    /// `None` when no student was found and nothing was written.
    pub stats: Option<SummaryStats>,
    /// Human readable report for the console.
    pub report: String,
}

/// Extracts the students of one roster file.
#[instrument(level = "debug", skip_all, fields(file = %path.display()))]
pub fn roster_file(path: &Path, config: &SummaryConfig) -> Result<Vec<StudentRecord>> {
    let grid = excel_read::read_grid(path)?;
    Ok(roster::extract_students(&grid, config, &discover::file_name(path)))
}

/// Collects the scores of one file of a per-file-keyed category.
#[instrument(level = "debug", skip_all, fields(file = %path.display()))]
pub fn keyed_file(
    path: &Path,
    category: &KeyedCategory,
    config: &SummaryConfig,
    scores: &mut KeyedScores,
) -> Result<usize> {
    let table = excel_read::read_table(path)?;
    scores::collect_keyed(
        &table,
        &config.identifier_column,
        &category.score_keyword,
        &discover::category_key(path),
        &discover::file_name(path),
        scores,
    )
}

/// Collects the scores of one file of the aggregate category.
#[instrument(level = "debug", skip_all, fields(file = %path.display()))]
pub fn aggregate_file(
    path: &Path,
    category: &AggregateCategory,
    config: &SummaryConfig,
    scores: &mut AggregateScores,
) -> Result<usize> {
    let table = excel_read::read_table(path)?;
    scores::collect_aggregate(
        &table,
        &config.identifier_column,
        &category.source_column,
        &discover::file_name(path),
        scores,
    )
}

/// Reads every routed file in `files`. A file that fails to load is logged
/// and skipped; the rest of the batch continues.
#[instrument(level = "info", skip_all, fields(files = files.len()))]
pub fn collect(files: &[PathBuf], config: &SummaryConfig) -> Collection {
    let mut collection = Collection {
        aggregate: AggregateScores::new(config.aggregate.output_column.clone()),
        ..Collection::default()
    };

    for path in discover::select(files, &config.roster) {
        match roster_file(&path, config) {
            Ok(mut students) => collection.roster.append(&mut students),
            Err(error) => warn!(file = %discover::file_name(&path), %error, "roster file skipped"),
        }
    }
    info!(students = collection.roster.len(), "roster extracted");

    for category in &config.keyed {
        let mut scores = KeyedScores::new(category.rule.marker.clone());
        for path in discover::select(files, &category.rule) {
            if let Err(error) = keyed_file(&path, category, config, &mut scores) {
                warn!(file = %discover::file_name(&path), %error, "score file skipped");
            }
        }
        info!(
            category = %scores.category,
            students = scores.student_count(),
            columns = scores.keys().len(),
            "scores collected"
        );
        collection.keyed.push(scores);
    }

    for path in discover::select(files, &config.aggregate.rule) {
        if let Err(error) = aggregate_file(&path, &config.aggregate, config, &mut collection.aggregate) {
            warn!(file = %discover::file_name(&path), %error, "score file skipped");
        }
    }
    info!(
        column = %collection.aggregate.column,
        students = collection.aggregate.student_count(),
        "aggregate scores collected"
    );

    collection
}

/// Discovers, extracts, collects and merges the files of
/// [`SummaryConfig::data_dir`].
#[instrument(level = "info", skip_all, fields(dir = %config.data_dir.display()))]
pub fn build_summary(config: &SummaryConfig) -> Result<SummaryTable> {
    let files = discover::discover_files(&config.data_dir)?;
    let collection = collect(&files, config);
    let table = merge(
        &collection.roster,
        &collection.keyed,
        &collection.aggregate,
        config.missing_score,
    );
    info!(
        students = table.rows.len(),
        score_columns = table.score_columns.len(),
        "summary merged"
    );
    Ok(table)
}

/// Builds the summary, writes it to [`SummaryConfig::output`] and renders the
/// report. Nothing is written when no student was found.
#[instrument(
    level = "info",
    skip_all,
    fields(dir = %config.data_dir.display(), output = %config.output.display())
)]
pub fn run(config: &SummaryConfig) -> Result<RunOutcome> {
    let table = build_summary(config)?;
    if table.is_empty() {
        warn!("no student data found");
        return Ok(RunOutcome {
            table,
            stats: None,
            report: report::empty_report(),
        });
    }

    excel_write::write_summary(&config.output, &table)?;
    info!(rows = table.rows.len(), "summary written");

    let stats = report::compute_stats(&table);
    let report = report::build_report(&table, &stats, &config.output.display().to_string());
    Ok(RunOutcome {
        table,
        stats: Some(stats),
        report,
    })
}
