use std::collections::HashMap;
use std::fmt::Write;

use serde::Serialize;

use crate::gradebook::tools::model::{SummaryRow, SummaryTable, format_number};

/// Number of rows shown in the console preview.
pub const PREVIEW_ROWS: usize = 5;

/// Identity columns checked for completeness.
const COMPLETENESS_COLUMNS: [&str; 4] = ["原序号", "姓名", "班级", "性别"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreColumnStats {
    pub column: String,
    pub empty: usize,
    pub zero: usize,
    pub non_zero: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub label: String,
    pub count: usize,
}

/// Post-merge statistics over a [`SummaryTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    pub students: usize,
    pub columns: usize,
    pub score_columns: Vec<ScoreColumnStats>,
    /// Non-empty counts of the optional identity columns.
    pub completeness: Vec<GroupCount>,
    pub by_source_file: Vec<GroupCount>,
    pub by_gender: Vec<GroupCount>,
}

pub fn compute_stats(table: &SummaryTable) -> SummaryStats {
    let score_columns = table
        .score_columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let mut stats = ScoreColumnStats {
                column: column.clone(),
                empty: 0,
                zero: 0,
                non_zero: 0,
            };
            for value in table.rows.iter().filter_map(|row| row.scores.get(index)) {
                if value.is_nan() {
                    stats.empty += 1;
                } else if *value == 0.0 {
                    stats.zero += 1;
                } else {
                    stats.non_zero += 1;
                }
            }
            stats
        })
        .collect();

    let completeness = COMPLETENESS_COLUMNS
        .iter()
        .map(|column| GroupCount {
            label: column.to_string(),
            count: table
                .rows
                .iter()
                .filter(|row| !identity_value(row, column).is_empty())
                .count(),
        })
        .collect();

    SummaryStats {
        students: table.rows.len(),
        columns: table.columns().len(),
        score_columns,
        completeness,
        by_source_file: count_by(&table.rows, |row| row.student.source_file.as_str()),
        by_gender: count_by(&table.rows, |row| row.student.gender.as_str()),
    }
}

fn identity_value<'a>(row: &'a SummaryRow, column: &str) -> &'a str {
    match column {
        "原序号" => row.student.original_sequence.as_str(),
        "姓名" => row.student.name.as_str(),
        "班级" => row.student.class_label.as_str(),
        "性别" => row.student.gender.as_str(),
        _ => "",
    }
}

/// Counts rows per non-empty label, largest groups first.
fn count_by<F>(rows: &[SummaryRow], label: F) -> Vec<GroupCount>
where
    F: Fn(&SummaryRow) -> &str,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        let value = label(row);
        if !value.is_empty() {
            *counts.entry(value).or_insert(0) += 1;
        }
    }

    let mut groups: Vec<GroupCount> = counts
        .into_iter()
        .map(|(label, count)| GroupCount {
            label: label.to_string(),
            count,
        })
        .collect();
    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    groups
}

/// Renders the console report printed after a successful merge.
pub fn build_report(table: &SummaryTable, stats: &SummaryStats, output: &str) -> String {
    let mut out = String::new();
    let columns = table.columns();

    let _ = writeln!(out, "=== 成绩汇总结果 ===");
    let _ = writeln!(out, "汇总表包含 {} 名学生的成绩", stats.students);
    let _ = writeln!(out, "汇总表包含 {} 列数据", stats.columns);
    let _ = writeln!(out);
    let _ = writeln!(out, "列名清单:");
    for (index, column) in columns.iter().enumerate() {
        let _ = writeln!(out, "  {:2}. {}", index + 1, column);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "前{PREVIEW_ROWS}名学生的成绩预览:");
    let _ = writeln!(out, "{}", columns.join("  "));
    for row in table.rows.iter().take(PREVIEW_ROWS) {
        let cells: Vec<String> = row
            .identity_cells()
            .into_iter()
            .chain(row.scores.iter().map(|score| format_number(*score)))
            .collect();
        let _ = writeln!(out, "{}", cells.join("  "));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "成绩汇总表已导出至: {output}");

    let _ = writeln!(out);
    let _ = writeln!(out, "数据完整性检查:");
    for column in &stats.score_columns {
        let _ = writeln!(
            out,
            "  {}: {} 个空值, {} 个0值, {} 个有效成绩",
            column.column, column.empty, column.zero, column.non_zero
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "统计信息:");
    let _ = writeln!(out, "  基本信息完整性:");
    for entry in &stats.completeness {
        let _ = writeln!(out, "    {}: {} 人有数据", entry.label, entry.count);
    }
    let _ = writeln!(out, "  按来源文件统计:");
    for entry in &stats.by_source_file {
        let _ = writeln!(out, "    {}: {} 人", entry.label, entry.count);
    }
    if !stats.by_gender.is_empty() {
        let _ = writeln!(out, "  性别分布:");
        for entry in &stats.by_gender {
            let _ = writeln!(out, "    {}: {} 人", entry.label, entry.count);
        }
    }

    out
}

/// Report printed when no roster file yielded a student.
pub fn empty_report() -> String {
    "没有找到任何学生数据\n".to_string()
}
