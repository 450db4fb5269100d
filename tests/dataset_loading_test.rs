use lung_cli::data::data_files::DataFiles;
use lung_cli::data::dataset::Dataset;
use lung_cli::data::datatable::{DataTable, DataType};
use lung_cli::data::table_source::TableSource;
use lung_cli::ExplorerError;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn get_test_data_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path.push(filename);
    path
}

#[test]
fn test_sample_loads_with_all_columns() {
    let data = Dataset::load(get_test_data_path("lung_cancer_sample.csv")).unwrap();

    assert_eq!(data.name(), "lung_cancer_sample");
    assert_eq!(data.rows().len(), 25);
    assert_eq!(data.columns().len(), 23);
    assert_eq!(data.columns().position("Patient_ID"), Some(0));
    assert_eq!(data.columns().position("Performance_Status"), Some(22));
    assert_eq!(data.columns().position("patient_id"), None);
}

#[test]
fn test_column_index_is_bijective() {
    let data = Dataset::load(get_test_data_path("lung_cancer_sample.csv")).unwrap();
    let index = data.columns();

    for (pos, name) in index.names().iter().enumerate() {
        assert_eq!(index.position(name), Some(pos));
    }
}

#[test]
fn test_loading_twice_gives_identical_index() {
    let path = get_test_data_path("lung_cancer_sample.csv");
    let first = Dataset::load(&path).unwrap();
    let second = Dataset::load(&path).unwrap();

    assert_eq!(first.columns(), second.columns());
    assert_eq!(first.rows(), second.rows());
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nothing_here.csv");
    let err = Dataset::load(&missing).unwrap_err();

    assert!(matches!(err, ExplorerError::FileNotFound(ref p) if *p == missing));
    assert!(err.to_string().starts_with("File not found"));
}

#[test]
fn test_duplicate_header_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dup.csv");
    fs::write(&path, "Patient_ID,Age,Age\n1,40,41\n").unwrap();

    let err = Dataset::load(&path).unwrap_err();
    assert!(matches!(err, ExplorerError::DuplicateColumn(ref c) if c == "Age"));
}

#[test]
fn test_short_row_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("short.csv");
    fs::write(&path, "Patient_ID,Age,Gender\n1,40,Male\n2,41\n").unwrap();

    let err = Dataset::load(&path).unwrap_err();
    assert!(matches!(
        err,
        ExplorerError::RowArity {
            expected: 3,
            found: 2,
            ..
        }
    ));
}

#[test]
fn test_typed_table_infers_column_types() {
    let data = Dataset::load(get_test_data_path("lung_cancer_sample.csv")).unwrap();
    let table = DataTable::from_dataset(&data).unwrap();

    assert_eq!(table.row_count(), 25);
    assert_eq!(table.get_column("Patient_ID").unwrap().data_type, DataType::Integer);
    assert_eq!(table.get_column("Tumor_Size_mm").unwrap().data_type, DataType::Float);
    assert_eq!(table.get_column("Ethnicity").unwrap().data_type, DataType::String);

    let ethnicity = table.column_position("Ethnicity").unwrap();
    assert_eq!(
        table.distinct_values(ethnicity),
        vec!["Caucasian", "Hispanic", "African American", "Asian"]
    );
}

#[test]
fn test_data_directory_listing() {
    let dir = tempdir().unwrap();
    fs::copy(
        get_test_data_path("lung_cancer_sample.csv"),
        dir.path().join("patients.csv"),
    )
    .unwrap();
    fs::write(dir.path().join("readme.md"), "not data").unwrap();

    let files = DataFiles::list(dir.path()).unwrap();
    assert_eq!(files.names(), &["patients.csv"]);

    let data = Dataset::load(files.resolve("1").unwrap()).unwrap();
    assert_eq!(data.name(), "patients");
}
