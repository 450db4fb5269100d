use lung_cli::data::dataset::Dataset;
use lung_cli::data::results::Projection;
use lung_cli::data::row_queries::RowQueryEngine;
use lung_cli::ui::table_renderer::{render_result, render_table, DEFAULT_ROW_LIMIT, NO_RECORDS};
use std::path::PathBuf;

fn get_test_data_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path.push(filename);
    path
}

#[test]
fn test_single_record_layout() {
    let record: Projection = [("Age", "45"), ("Gender", "Male")].into_iter().collect();
    let output = render_table(&["Age", "Gender"], &[record], DEFAULT_ROW_LIMIT);

    let expected = "| Age    | Gender |\n-------------------\n| 45     | Male   |";
    assert_eq!(output, expected);
}

#[test]
fn test_no_rows_prints_notice() {
    let output = render_table(&["Age", "Gender"], &[], DEFAULT_ROW_LIMIT);
    assert_eq!(output, NO_RECORDS);
    assert_eq!(output, "No records found!");
}

#[test]
fn test_row_limit_caps_output() {
    let records: Vec<Projection> = (0..60)
        .map(|i| [("Age", i.to_string()), ("Gender", "Female".to_string())].into_iter().collect())
        .collect();

    let output = render_table(&["Age", "Gender"], &records, 50);
    let data_rows = output.lines().skip(2).count();
    assert_eq!(data_rows, 50);
    assert!(output.lines().last().unwrap().starts_with("| 49 "));
}

#[test]
fn test_render_query_result() {
    let data = Dataset::load(get_test_data_path("lung_cancer_sample.csv")).unwrap();
    let result = RowQueryEngine::new(&data).medical_history("asian").unwrap();

    let output = render_result(&result, 2);
    let lines: Vec<&str> = output.lines().collect();

    // Every cell is padded to the longest column name, Comorbidity_Kidney_Disease
    let width = "Comorbidity_Kidney_Disease".len();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0].len(), 1 + 4 * (width + 3));
    assert_eq!(lines[1], "-".repeat(lines[0].len()));
    assert!(lines[2].starts_with(&format!("| {:<width$} |", "No", width = width)));
}
