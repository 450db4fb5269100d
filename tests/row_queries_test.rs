use lung_cli::data::dataset::Dataset;
use lung_cli::data::predicate::Predicate;
use lung_cli::data::row_queries::{
    RowQueryEngine, DEMOGRAPHIC_COLUMNS, HYPERTENSION_COLUMNS, LONG_SURVIVAL_COLUMNS,
    MEDICAL_HISTORY_COLUMNS,
};
use lung_cli::ExplorerError;
use std::path::PathBuf;

fn get_test_data_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path.push(filename);
    path
}

fn load_sample() -> Dataset {
    Dataset::load(get_test_data_path("lung_cancer_sample.csv")).expect("Failed to load sample")
}

#[test]
fn test_demographic_lookup_by_id() {
    let data = load_sample();
    let result = RowQueryEngine::new(&data).demographic_info(7).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.columns, DEMOGRAPHIC_COLUMNS);
    let record = &result.records[0];
    assert_eq!(record.get("Age"), Some("53"));
    assert_eq!(record.get("Gender"), Some("Female"));
    assert_eq!(record.get("Smoking_History"), Some("Current Smoker"));
    assert_eq!(record.get("Ethnicity"), Some("Caucasian"));
}

#[test]
fn test_demographic_lookup_absent_id() {
    let data = load_sample();
    let err = RowQueryEngine::new(&data).demographic_info(999).unwrap_err();
    assert!(matches!(err, ExplorerError::NotFound(_)));
    assert_eq!(err.to_string(), "Patient ID 999 not found!");
}

#[test]
fn test_medical_history_ignores_case() {
    let data = load_sample();
    let engine = RowQueryEngine::new(&data);

    for needle in ["caucasian", "CAUCASIAN", "cauc"] {
        let result = engine.medical_history(needle).unwrap();
        assert_eq!(result.len(), 15, "needle {}", needle);
        assert_eq!(result.columns, MEDICAL_HISTORY_COLUMNS);
    }

    assert!(engine.medical_history("martian").unwrap().is_empty());
}

#[test]
fn test_long_survival_is_strict() {
    let data = load_sample();
    let engine = RowQueryEngine::new(&data);

    let result = engine.long_survival(117.0).unwrap();
    let ages: Vec<&str> = result.records.iter().filter_map(|r| r.get("Age")).collect();
    // 118 and 119 months; the two patients at exactly 117 are excluded
    assert_eq!(ages, vec!["76", "74"]);
    assert_eq!(result.columns, LONG_SURVIVAL_COLUMNS);

    assert_eq!(engine.long_survival(110.0).unwrap().len(), 7);
}

#[test]
fn test_hypertension_cohort_uses_or() {
    let data = load_sample();
    let engine = RowQueryEngine::new(&data);

    // Threshold above every diastolic value: only the flagged patients remain
    let flagged = engine.hypertension_cohort(200.0).unwrap();
    assert_eq!(flagged.len(), 5);
    assert_eq!(flagged.columns, HYPERTENSION_COLUMNS);

    let cohort = engine.hypertension_cohort(95.0).unwrap();
    assert_eq!(cohort.len(), 11);
}

#[test]
fn test_unparseable_number_is_an_error() {
    let csv = "Patient_ID,Age,Tumor_Size_mm,Tumor_Location,Stage,Survival_Months\n\
               1,50,20.0,Upper Lobe,Stage I,120\n\
               2,51,21.0,Lower Lobe,Stage II,unknown\n";
    let data = Dataset::from_reader("broken", csv.as_bytes()).unwrap();

    let err = RowQueryEngine::new(&data).long_survival(100.0).unwrap_err();
    match err {
        ExplorerError::InvalidField { row, column, value } => {
            assert_eq!(row, 2);
            assert_eq!(column, "Survival_Months");
            assert_eq!(value, "unknown");
        }
        other => panic!("expected InvalidField, got {:?}", other),
    }
}

#[test]
fn test_custom_select() {
    let data = load_sample();
    let predicate = Predicate::equals("Treatment", "Targeted Therapy")
        .and(Predicate::greater_than("Survival_Months", 100.0));
    let result = RowQueryEngine::new(&data)
        .select(&predicate, &["Patient_ID", "Ethnicity"])
        .unwrap();

    let ids: Vec<&str> = result
        .records
        .iter()
        .filter_map(|r| r.get("Patient_ID"))
        .collect();
    assert_eq!(ids, vec!["21", "22"]);
}
