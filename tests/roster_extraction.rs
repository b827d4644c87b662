use gradebook_tools::config::SummaryConfig;
use gradebook_tools::header::{classify, locate_header, locate_identifier_anchor};
use gradebook_tools::model::{HeaderField, RawGrid};
use gradebook_tools::roster::{ExtractionStrategy, extract_students, is_valid_identifier};

fn grid(rows: &[&[&str]]) -> RawGrid {
    let rows: Vec<Vec<&str>> = rows.iter().map(|row| row.to_vec()).collect();
    RawGrid::from_text(&rows)
}

#[test]
fn header_row_found_after_title_rows() {
    let grid = grid(&[
        &["2023 秋季学生名单"],
        &[""],
        &["序号", "学号", "姓名", "班级", "性别"],
        &["1", "20230001A", "Alice", "ClassX", "F"],
    ]);

    let header = locate_header(&grid, 20, 2).expect("header located");
    assert_eq!(header.row, 2);
    assert_eq!(header.mapping.len(), 5);
    assert_eq!(header.mapping.get(HeaderField::Sequence), Some(0));
    assert_eq!(header.mapping.get(HeaderField::Identifier), Some(1));
    assert_eq!(header.mapping.get(HeaderField::Name), Some(2));
    assert_eq!(header.mapping.get(HeaderField::Class), Some(3));
    assert_eq!(header.mapping.get(HeaderField::Gender), Some(4));
}

#[test]
fn header_requires_two_distinct_fields() {
    let grid = grid(&[&["学号", "学号"], &["Student", "备注"]]);
    assert_eq!(locate_header(&grid, 20, 2), None);
}

#[test]
fn later_cell_wins_for_repeated_field() {
    let grid = grid(&[&["学号", "姓名", "Student ID"]]);

    let header = locate_header(&grid, 20, 2).expect("header located");
    assert_eq!(header.mapping.get(HeaderField::Identifier), Some(2));
    assert_eq!(header.mapping.get(HeaderField::Name), Some(1));
    assert_eq!(header.mapping.len(), 2);
}

#[test]
fn header_outside_scan_window_is_ignored() {
    let mut rows: Vec<Vec<&str>> = vec![vec!["备注"]; 20];
    rows.push(vec!["学号", "姓名"]);
    let grid = RawGrid::from_text(&rows);

    assert_eq!(locate_header(&grid, 20, 2), None);
    assert!(locate_header(&grid, 21, 2).is_some());
}

#[test]
fn header_cell_names_one_field_in_priority_order() {
    assert_eq!(classify("Student Name"), Some(HeaderField::Identifier));
    assert_eq!(classify("  NAME "), Some(HeaderField::Name));
    assert_eq!(classify("专业班级"), Some(HeaderField::Class));
    assert_eq!(classify("男女"), Some(HeaderField::Gender));
    assert_eq!(classify("编号"), Some(HeaderField::Sequence));
    assert_eq!(classify("备注"), None);
    assert_eq!(classify(""), None);
}

#[test]
fn identifier_predicate_accepts_mixed_enrollment_numbers() {
    assert!(is_valid_identifier("20230001A"));
    assert!(is_valid_identifier(" 2023-ABC-01 "));
    assert!(is_valid_identifier("T2023000101"));
}

#[test]
fn identifier_predicate_rejects_each_failed_clause() {
    assert!(!is_valid_identifier(""));
    assert!(!is_valid_identifier("nan"));
    assert!(!is_valid_identifier("abc"));
    assert!(!is_valid_identifier("2023A01"));
    assert!(!is_valid_identifier("ABCDEFGH"));
    assert!(!is_valid_identifier("12345678"));
    assert!(!is_valid_identifier("2023-0001.5"));
}

#[test]
fn mapped_roster_keeps_only_valid_identifiers() {
    let grid = grid(&[
        &["序号", "学号", "姓名", "班级", "性别"],
        &["1", "20230001A", "Alice", "ClassX", "F"],
        &["2", "abc", "Bob", "ClassY", "M"],
    ]);
    let config = SummaryConfig::default();

    let students = extract_students(&grid, &config, "CL1.xls");
    assert_eq!(students.len(), 1);

    let alice = &students[0];
    assert_eq!(alice.identifier, "20230001A");
    assert_eq!(alice.name, "Alice");
    assert_eq!(alice.original_sequence, "1");
    assert_eq!(alice.class_label, "ClassX");
    assert_eq!(alice.gender, "F");
    assert_eq!(alice.source_file, "CL1.xls");
}

#[test]
fn mapped_roster_drops_non_numeric_sequence_and_missing_cells() {
    let grid = grid(&[
        &["序号", "学号", "姓名", "班级", "性别"],
        &["A1", "20230001A", "nan", "", "女"],
    ]);

    let students = extract_students(&grid, &SummaryConfig::default(), "CL1.xls");
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].original_sequence, "");
    assert_eq!(students[0].name, "");
    assert_eq!(students[0].class_label, "");
    assert_eq!(students[0].gender, "女");
}

#[test]
fn mapped_roster_scans_thirty_rows_below_header() {
    let identifiers: Vec<String> = (0..35).map(|index| format!("2023S{index:04}")).collect();
    let mut rows: Vec<Vec<&str>> = vec![vec!["学号", "姓名"]];
    rows.extend(identifiers.iter().map(|id| vec![id.as_str(), "Someone"]));
    let grid = RawGrid::from_text(&rows);

    let students = extract_students(&grid, &SummaryConfig::default(), "CL1.xls");
    assert_eq!(students.len(), 30);
    assert_eq!(students[0].identifier, "2023S0000");
    assert_eq!(students[29].identifier, "2023S0029");
}

#[test]
fn fallback_infers_fields_from_row_shape() {
    let grid = grid(&[
        &["备注", "学号", "", "", ""],
        &["12", "2023A0005", "张三", "男", "工商管理1班"],
        &["", "short", "李四", "", ""],
    ]);
    let config = SummaryConfig::default();

    assert_eq!(
        ExtractionStrategy::select(&grid, &config),
        ExtractionStrategy::Fallback {
            anchor_row: 0,
            column: 1
        }
    );

    let students = extract_students(&grid, &config, "CL2.xls");
    assert_eq!(students.len(), 1);
    let student = &students[0];
    assert_eq!(student.identifier, "2023A0005");
    assert_eq!(student.original_sequence, "12");
    assert_eq!(student.name, "张三");
    assert_eq!(student.gender, "男");
    assert_eq!(student.class_label, "工商管理1班");
}

#[test]
fn fallback_fills_each_field_once_left_to_right() {
    let grid = grid(&[
        &["学号"],
        &["2023A0007", "王五", "赵六", "女", "男", "1", "2"],
    ]);

    let students = extract_students(&grid, &SummaryConfig::default(), "CL2.xls");
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].name, "王五");
    assert_eq!(students[0].gender, "女");
    assert_eq!(students[0].original_sequence, "1");
    assert_eq!(students[0].class_label, "");
}

#[test]
fn header_without_identifier_falls_back_to_label_search() {
    let grid = grid(&[
        &["姓名", "班级"],
        &["Alice", "ClassX"],
        &["备注", "学号"],
        &["Bob", "20230002B"],
    ]);

    let strategy = ExtractionStrategy::select(&grid, &SummaryConfig::default());
    assert_eq!(
        strategy,
        ExtractionStrategy::Fallback {
            anchor_row: 2,
            column: 1
        }
    );
    assert_eq!(locate_identifier_anchor(&grid, 20), Some((2, 1)));
}

#[test]
fn roster_without_identifier_label_yields_nothing() {
    let grid = grid(&[&["姓名", "班级"], &["Alice", "20230001A"]]);
    let config = SummaryConfig::default();

    assert_eq!(
        ExtractionStrategy::select(&grid, &config),
        ExtractionStrategy::Unavailable
    );
    assert!(extract_students(&grid, &config, "CL3.xls").is_empty());
}
