use gradebook_tools::ToolError;
use gradebook_tools::merge::merge;
use gradebook_tools::model::{
    AggregateScores, Cell, KeyedScores, LabeledTable, RawGrid, StudentRecord,
};
use gradebook_tools::report::compute_stats;
use gradebook_tools::scores::{collect_aggregate, collect_keyed};

fn text(value: &str) -> Cell {
    Cell::Text(value.to_string())
}

fn table(rows: Vec<Vec<Cell>>) -> LabeledTable {
    LabeledTable::from_grid(RawGrid::new(rows))
}

fn student(identifier: &str, source: &str) -> StudentRecord {
    StudentRecord::new(identifier, source)
}

#[test]
fn keyed_scores_use_first_matching_column_and_file_key() {
    let sa1 = table(vec![
        vec![text("学号"), text("姓名"), text("SA1得分"), text("SA1得分(补)")],
        vec![text("20230001A"), text("Alice"), Cell::Number(85.0), Cell::Number(99.0)],
    ]);
    let mut scores = KeyedScores::new("SA");

    let recorded = collect_keyed(&sa1, "学号", "得分", "SA1", "SA1.xls", &mut scores)
        .expect("scores collected");

    assert_eq!(recorded, 1);
    assert_eq!(scores.get("20230001A", "SA1"), Some(85.0));
    assert_eq!(scores.keys(), vec!["SA1".to_string()]);
}

#[test]
fn keyed_scores_skip_missing_and_malformed_cells() {
    let sa2 = table(vec![
        vec![text("学号"), text("SA2得分")],
        vec![Cell::Empty, Cell::Number(70.0)],
        vec![text("20230002B"), Cell::Empty],
        vec![text("20230003C"), text("缺考")],
        vec![text("20230004D"), text(" 77.5 ")],
        vec![Cell::Number(20230005.0), Cell::Number(60.0)],
    ]);
    let mut scores = KeyedScores::new("SA");

    let recorded = collect_keyed(&sa2, "学号", "得分", "SA2", "SA2.xls", &mut scores)
        .expect("scores collected");

    assert_eq!(recorded, 2);
    assert_eq!(scores.get("20230002B", "SA2"), None);
    assert_eq!(scores.get("20230003C", "SA2"), None);
    assert_eq!(scores.get("20230004D", "SA2"), Some(77.5));
    assert_eq!(scores.get("20230005", "SA2"), Some(60.0));
}

#[test]
fn table_without_score_column_contributes_nothing() {
    let sa3 = table(vec![
        vec![text("姓名"), text("备注")],
        vec![text("Alice"), text("late")],
    ]);
    let mut scores = KeyedScores::new("SA");

    let recorded = collect_keyed(&sa3, "学号", "得分", "SA3", "SA3.xls", &mut scores)
        .expect("no score column is not an error");

    assert_eq!(recorded, 0);
    assert!(scores.keys().is_empty());
}

#[test]
fn score_column_without_identifier_column_is_an_error() {
    let sa4 = table(vec![
        vec![text("Student"), text("SA4得分")],
        vec![text("20230001A"), Cell::Number(10.0)],
    ]);
    let mut scores = KeyedScores::new("SA");

    let error = collect_keyed(&sa4, "学号", "得分", "SA4", "SA4.xls", &mut scores)
        .expect_err("identifier column required");

    assert!(matches!(error, ToolError::MissingColumn { ref column, .. } if column == "学号"));
}

#[test]
fn aggregate_scores_overwrite_across_tables() {
    let first = table(vec![
        vec![text("学号"), text("讨论/")],
        vec![text("20230001A"), Cell::Number(5.0)],
        vec![text("20230002B"), Cell::Number(4.0)],
    ]);
    let second = table(vec![
        vec![text("讨论/"), text("学号")],
        vec![Cell::Number(8.0), text("20230001A")],
    ]);
    let unrelated = table(vec![
        vec![text("学号"), text("讨论")],
        vec![text("20230001A"), Cell::Number(1.0)],
    ]);
    let mut scores = AggregateScores::new("TL讨论");

    collect_aggregate(&first, "学号", "讨论/", "TL1.xlsx", &mut scores).expect("first table");
    collect_aggregate(&second, "学号", "讨论/", "TL2.xlsx", &mut scores).expect("second table");
    let recorded = collect_aggregate(&unrelated, "学号", "讨论/", "TL3.xlsx", &mut scores)
        .expect("exact column name required");

    assert_eq!(recorded, 0);
    assert_eq!(scores.get("20230001A"), Some(8.0));
    assert_eq!(scores.get("20230002B"), Some(4.0));
}

#[test]
fn merge_is_a_left_join_driven_by_the_roster() {
    let roster = vec![
        student("20230001A", "CL1.xls"),
        student("20230002B", "CL1.xls"),
    ];
    let mut sa = KeyedScores::new("SA");
    sa.record("20230001A".into(), "SA1", 85.0);
    sa.record("99999999Z".into(), "SA1", 70.0);
    let aggregate = AggregateScores::new("TL讨论");

    let summary = merge(&roster, &[sa], &aggregate, 0.0);

    assert_eq!(summary.score_columns, vec!["SA1", "TL讨论"]);
    assert_eq!(summary.rows.len(), 2);
    assert_eq!(summary.score("20230001A", "SA1"), Some(85.0));
    assert_eq!(summary.score("20230002B", "SA1"), Some(0.0));
    assert_eq!(summary.score("20230002B", "TL讨论"), Some(0.0));
    assert!(summary.row_for("99999999Z").is_none());
}

#[test]
fn merge_orders_columns_by_category_then_key() {
    let roster = vec![student("20230001A", "CL1.xls")];
    let mut sa = KeyedScores::new("SA");
    sa.record("20230001A".into(), "SA3", 3.0);
    sa.record("20230009Z".into(), "SA1", 1.0);
    sa.record("20230001A".into(), "SA2", 2.0);
    let mut la = KeyedScores::new("LA");
    la.record("20230001A".into(), "LA2", 20.0);
    la.record("20230001A".into(), "LA1", 10.0);
    let mut tl = AggregateScores::new("TL讨论");
    tl.record("20230001A".into(), 6.0);

    let summary = merge(&roster, &[sa, la], &tl, 0.0);

    assert_eq!(
        summary.columns(),
        vec![
            "序号", "原序号", "学号", "姓名", "班级", "性别", "来源文件", "SA1", "SA2", "SA3",
            "LA1", "LA2", "TL讨论"
        ]
    );
    assert_eq!(summary.rows[0].scores, vec![0.0, 2.0, 3.0, 10.0, 20.0, 6.0]);
}

#[test]
fn merge_keeps_duplicate_roster_rows_and_renumbers() {
    let roster = vec![
        student("20230001A", "CL1.xls"),
        student("20230002B", "CL1.xls"),
        student("20230001A", "CL2.xls"),
    ];
    let mut tl = AggregateScores::new("TL讨论");
    tl.record("20230001A".into(), 7.0);

    let summary = merge(&roster, &[], &tl, 0.0);

    let sequences: Vec<usize> = summary.rows.iter().map(|row| row.sequence).collect();
    assert_eq!(sequences, vec![1, 2, 3]);
    assert_eq!(summary.rows[0].scores, vec![7.0]);
    assert_eq!(summary.rows[2].scores, vec![7.0]);
    assert_eq!(summary.rows[2].student.source_file, "CL2.xls");
}

#[test]
fn stats_count_zero_and_scored_cells() {
    let mut alice = student("20230001A", "CL1.xls");
    alice.gender = "女".into();
    alice.name = "Alice".into();
    let mut bob = student("20230002B", "CL1.xls");
    bob.gender = "男".into();
    let carol = student("20230003C", "CL2.xls");
    let mut sa = KeyedScores::new("SA");
    sa.record("20230001A".into(), "SA1", 85.0);

    let summary = merge(&[alice, bob, carol], &[sa], &AggregateScores::new("TL讨论"), 0.0);
    let stats = compute_stats(&summary);

    assert_eq!(stats.students, 3);
    assert_eq!(stats.columns, 9);
    assert_eq!(stats.score_columns[0].column, "SA1");
    assert_eq!(stats.score_columns[0].zero, 2);
    assert_eq!(stats.score_columns[0].non_zero, 1);
    assert_eq!(stats.score_columns[0].empty, 0);
    assert_eq!(stats.score_columns[1].zero, 3);

    let names = stats
        .completeness
        .iter()
        .find(|entry| entry.label == "姓名")
        .expect("name completeness");
    assert_eq!(names.count, 1);

    assert_eq!(stats.by_source_file[0].label, "CL1.xls");
    assert_eq!(stats.by_source_file[0].count, 2);
    assert_eq!(stats.by_source_file[1].label, "CL2.xls");
    assert_eq!(stats.by_gender.len(), 2);
}
