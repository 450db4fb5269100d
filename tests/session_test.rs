use lung_cli::config::Config;
use lung_cli::session::{resolve_data_file, LastResult, Session};
use lung_cli::ui::prompts::ScriptedLines;
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

fn open_sample() -> Session {
    Session::open(get_test_data_path("lung_cancer_sample.csv"), Config::default()).unwrap()
}

#[test]
fn test_scripted_session_answers_and_exports() {
    let dir = tempdir().unwrap();
    let csv_out = dir.path().join("crosstab.csv");
    let json_out = dir.path().join("top.json");

    let mut session = open_sample();
    let mut input = ScriptedLines::new(vec![
        "12".to_string(),
        format!("\\export {}", csv_out.display()),
        "5".to_string(),
        "Caucasian".to_string(),
        format!("\\export {}", json_out.display()),
        "q".to_string(),
    ]);
    session.run(&mut input).unwrap();

    let csv = fs::read_to_string(&csv_out).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("Treatment,Medicaid,Medicare,Other,Private")
    );
    assert_eq!(lines.next(), Some("Chemotherapy,1,2,3,1"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_out).unwrap()).unwrap();
    assert_eq!(json["kind"], "frequencies");
    assert_eq!(json["labels"][0], "Surgery");
    assert_eq!(json["counts"][1], 5);
}

#[test]
fn test_invalid_input_reprompts() {
    let mut session = open_sample();
    let mut input = ScriptedLines::new(["1", "seven", "", "7", "quit"]);
    session.run(&mut input).unwrap();

    match session.last_result() {
        Some(LastResult::Records(result)) => {
            assert_eq!(result.len(), 1);
            assert_eq!(result.records[0].get("Age"), Some("53"));
        }
        other => panic!("expected a record result, got {:?}", other),
    }
}

#[test]
fn test_unknown_gender_is_reported_not_fatal() {
    let mut session = open_sample();
    let mut input = ScriptedLines::new(["8", "robot", "11", "q"]);
    session.run(&mut input).unwrap();

    assert!(matches!(
        session.last_result(),
        Some(LastResult::Aggregate(table)) if table.len() == 4
    ));
}

#[test]
fn test_load_switches_dataset() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("small.csv"),
        "Patient_ID,Age,Gender,Smoking_History,Ethnicity\n1,50,Male,Never Smoked,Asian\n",
    )
    .unwrap();

    let mut config = Config::default();
    config.data.data_dir = dir.path().to_path_buf();
    let mut session =
        Session::open(get_test_data_path("lung_cancer_sample.csv"), config.clone()).unwrap();

    let mut input = ScriptedLines::new(["\\load small.csv", "1", "1", "q"]);
    session.run(&mut input).unwrap();

    assert_eq!(session.dataset().name(), "small");
    assert_eq!(session.dataset().rows().len(), 1);
    assert_eq!(resolve_data_file(&config, "1"), dir.path().join("small.csv"));
}
