use crate::error::{ExplorerError, Result};
use crossterm::style::Stylize;

/// Backslash commands with their help text
pub const COMMANDS: [(&str, &str); 5] = [
    ("\\help", "Show this menu"),
    ("\\files", "List CSV files in the data directory"),
    ("\\load", "Load another CSV file: \\load <file>"),
    ("\\export", "Export the last result: \\export <file.csv|file.json>"),
    ("\\logs", "Show recent log entries"),
];

/// The canned questions, in menu order
pub const QUESTIONS: [&str; 12] = [
    "Demographic information for a patient ID",
    "Medical history for an ethnicity",
    "Patients surviving longer than N months",
    "Hypertension or high diastolic pressure cohort",
    "Top treatments for an ethnicity among long-term survivors",
    "Mean white blood cell count for a treatment within an ethnicity",
    "Mean pack-years by tumor location and treatment",
    "Mean survival and blood pressure by treatment and stage for a gender",
    "Treatment distribution for an ethnicity",
    "Mean pack-years by cancer stage and ethnicity",
    "Mean blood pressure by treatment",
    "Treatment counts by insurance type",
];

#[derive(Debug, Clone, PartialEq)]
pub enum MenuAction {
    DemographicInfo,
    MedicalHistory,
    LongSurvival,
    HypertensionCohort,
    TopTreatments,
    WhiteBloodCellCount,
    PackYearsByLocationAndTreatment,
    SurvivalAndBloodPressureByGender,
    TreatmentDistribution,
    PackYearsByStageAndEthnicity,
    BloodPressureByTreatment,
    TreatmentsByInsurance,
    Help,
    Files,
    Load(String),
    Export(Option<String>),
    Logs,
    Quit,
}

impl MenuAction {
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if crate::ui::prompts::is_quit(input) {
            return Ok(MenuAction::Quit);
        }

        if let Some(command) = input.strip_prefix('\\') {
            let (name, arg) = match command.split_once(char::is_whitespace) {
                Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
                None => (command, None),
            };
            return match (name, arg) {
                ("help", _) => Ok(MenuAction::Help),
                ("files", _) => Ok(MenuAction::Files),
                ("logs", _) => Ok(MenuAction::Logs),
                ("load", Some(file)) => Ok(MenuAction::Load(file.to_string())),
                ("load", None) => Err(ExplorerError::InvalidInput(
                    "Usage: \\load <file>".to_string(),
                )),
                ("export", arg) => Ok(MenuAction::Export(arg.map(str::to_string))),
                _ => Err(ExplorerError::InvalidInput(format!(
                    "Unknown command '\\{}'. Type \\help for the menu",
                    name
                ))),
            };
        }

        let action = match input.parse::<usize>() {
            Ok(1) => MenuAction::DemographicInfo,
            Ok(2) => MenuAction::MedicalHistory,
            Ok(3) => MenuAction::LongSurvival,
            Ok(4) => MenuAction::HypertensionCohort,
            Ok(5) => MenuAction::TopTreatments,
            Ok(6) => MenuAction::WhiteBloodCellCount,
            Ok(7) => MenuAction::PackYearsByLocationAndTreatment,
            Ok(8) => MenuAction::SurvivalAndBloodPressureByGender,
            Ok(9) => MenuAction::TreatmentDistribution,
            Ok(10) => MenuAction::PackYearsByStageAndEthnicity,
            Ok(11) => MenuAction::BloodPressureByTreatment,
            Ok(12) => MenuAction::TreatmentsByInsurance,
            _ => {
                return Err(ExplorerError::InvalidInput(format!(
                    "Please choose 1-{}, a \\command or 'q' to quit, got '{}'",
                    QUESTIONS.len(),
                    input
                )))
            }
        };
        Ok(action)
    }
}

pub fn print_menu(dataset_name: &str) {
    println!();
    println!(
        "{}",
        format!("Lung CLI - exploring '{}'", dataset_name).blue().bold()
    );
    println!("{}", "Questions:".yellow());
    for (i, question) in QUESTIONS.iter().enumerate() {
        println!("  {}. {}", format!("{:>2}", i + 1).green(), question);
    }
    println!("{}", "Commands:".yellow());
    for (name, description) in COMMANDS {
        println!("  {} - {}", format!("{:<8}", name).green(), description);
    }
    println!("  {} - Quit", format!("{:<8}", "q").green());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numbers() {
        assert_eq!(MenuAction::parse("1").unwrap(), MenuAction::DemographicInfo);
        assert_eq!(
            MenuAction::parse(" 12 ").unwrap(),
            MenuAction::TreatmentsByInsurance
        );
        assert!(MenuAction::parse("13").is_err());
        assert!(MenuAction::parse("0").is_err());
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(MenuAction::parse("\\help").unwrap(), MenuAction::Help);
        assert_eq!(
            MenuAction::parse("\\load  other.csv ").unwrap(),
            MenuAction::Load("other.csv".to_string())
        );
        assert!(MenuAction::parse("\\load").is_err());
        assert_eq!(MenuAction::parse("\\export").unwrap(), MenuAction::Export(None));
        assert_eq!(
            MenuAction::parse("\\export out.json").unwrap(),
            MenuAction::Export(Some("out.json".to_string()))
        );
        assert!(MenuAction::parse("\\clear").is_err());
    }

    #[test]
    fn test_parse_quit() {
        assert_eq!(MenuAction::parse("QUIT").unwrap(), MenuAction::Quit);
        assert!(MenuAction::parse("queen").is_err());
    }
}
