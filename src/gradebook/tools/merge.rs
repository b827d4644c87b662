use crate::gradebook::tools::model::{
    AggregateScores, KeyedScores, StudentRecord, SummaryRow, SummaryTable,
};

/// Where the value of one score column comes from.
enum ColumnSource<'a> {
    Keyed { scores: &'a KeyedScores, key: String },
    Aggregate(&'a AggregateScores),
}

impl ColumnSource<'_> {
    fn label(&self) -> String {
        match self {
            ColumnSource::Keyed { key, .. } => key.clone(),
            ColumnSource::Aggregate(scores) => scores.column.clone(),
        }
    }

    fn lookup(&self, identifier: &str) -> Option<f64> {
        match self {
            ColumnSource::Keyed { scores, key } => scores.get(identifier, key),
            ColumnSource::Aggregate(scores) => scores.get(identifier),
        }
    }
}

/// Left-joins the roster with every score category.
///
/// The roster drives the output: one row per record in roster order, numbered
/// from 1, and scores of identifiers absent from the roster never appear.
/// Score columns are each keyed category's sorted keys, in category order,
/// followed by the aggregate column. Absent scores become `missing_score`.
pub fn merge(
    roster: &[StudentRecord],
    keyed: &[KeyedScores],
    aggregate: &AggregateScores,
    missing_score: f64,
) -> SummaryTable {
    let mut sources: Vec<ColumnSource<'_>> = Vec::new();
    for scores in keyed {
        sources.extend(
            scores
                .keys()
                .into_iter()
                .map(|key| ColumnSource::Keyed { scores, key }),
        );
    }
    sources.push(ColumnSource::Aggregate(aggregate));

    let rows = roster
        .iter()
        .enumerate()
        .map(|(index, student)| SummaryRow {
            sequence: index + 1,
            student: student.clone(),
            scores: sources
                .iter()
                .map(|source| source.lookup(&student.identifier).unwrap_or(missing_score))
                .collect(),
        })
        .collect();

    SummaryTable {
        score_columns: sources.iter().map(ColumnSource::label).collect(),
        rows,
    }
}
