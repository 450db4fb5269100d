//! Interactive session
//!
//! Owns the loaded dataset, its typed table, the configuration and the last
//! result. Every question reads its parameters from a [`LineSource`], runs
//! against one of the two engines and prints the answer. Query errors are
//! reported and the session carries on.

use crate::config::Config;
use crate::data::data_exporter::DataExporter;
use crate::data::data_files::DataFiles;
use crate::data::data_provider::DataProvider;
use crate::data::dataset::Dataset;
use crate::data::datatable::DataTable;
use crate::data::grouped_queries::GroupedQueryEngine;
use crate::data::results::{AggregateTable, CrossTab, FrequencySeries, QueryResult};
use crate::data::row_queries::RowQueryEngine;
use crate::error::{ExplorerError, Result as ExplorerResult};
use crate::ui::menu::{print_menu, MenuAction};
use crate::ui::prompts::{
    parse_patient_id, parse_threshold, prompt_parsed, prompt_text, LineSource, PromptInput,
};
use crate::ui::{result_display, table_renderer};
use crate::utils::logging::get_log_buffer;
use crate::utils::text::capitalise_words;
use anyhow::{anyhow, Result};
use crossterm::style::Stylize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const LOG_LINES_SHOWN: usize = 50;

/// Leave the current question when the user quits a prompt
macro_rules! ask {
    ($prompt:expr) => {
        match $prompt? {
            PromptInput::Value(value) => value,
            PromptInput::Quit => return Ok(None),
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Last answer, kept for `\export`
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LastResult {
    Records(QueryResult),
    Frequencies(FrequencySeries),
    Aggregate(AggregateTable),
    /// Aggregate whose chart shape is one line per series
    Series(AggregateTable),
    CrossTab(CrossTab),
    Scalar { label: String, value: f64 },
}

impl LastResult {
    /// Tabular view for CSV export, `None` for a single value
    pub fn provider(&self) -> Option<&dyn DataProvider> {
        match self {
            LastResult::Records(r) => Some(r),
            LastResult::Frequencies(f) => Some(f),
            LastResult::Aggregate(a) | LastResult::Series(a) => Some(a),
            LastResult::CrossTab(c) => Some(c),
            LastResult::Scalar { .. } => None,
        }
    }
}

/// Resolve a file selection: an existing path as given, otherwise a name or
/// listing number inside the data directory
pub fn resolve_data_file(config: &Config, selection: &str) -> PathBuf {
    let direct = PathBuf::from(selection.trim());
    if direct.is_file() {
        return direct;
    }

    DataFiles::list(&config.data.data_dir)
        .and_then(|files| files.resolve(selection))
        .unwrap_or(direct)
}

pub fn print_data_files(config: &Config) -> ExplorerResult<DataFiles> {
    let files = DataFiles::list(&config.data.data_dir)?;
    println!(
        "{}",
        format!(
            "The available files to analyse, in the '{}' directory:",
            files.dir().display()
        )
        .cyan()
    );
    if files.is_empty() {
        println!("{}", "  (no CSV files)".yellow());
    }
    for (i, name) in files.names().iter().enumerate() {
        println!("  {}. {}", i + 1, name);
    }
    Ok(files)
}

pub struct Session {
    dataset: Dataset,
    table: DataTable,
    config: Config,
    last_result: Option<LastResult>,
}

impl Session {
    pub fn new(dataset: Dataset, config: Config) -> ExplorerResult<Self> {
        let table = DataTable::from_dataset(&dataset)?;
        info!(
            "Session ready for '{}': {} rows",
            dataset.name(),
            dataset.rows().len()
        );
        debug!("{}", table.debug_dump());
        Ok(Self {
            dataset,
            table,
            config,
            last_result: None,
        })
    }

    pub fn open<P: AsRef<Path>>(path: P, config: Config) -> ExplorerResult<Self> {
        Self::new(Dataset::load(path)?, config)
    }

    /// Replace the loaded file. On failure the current data stays loaded.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> ExplorerResult<()> {
        let dataset = Dataset::load(path)?;
        let table = DataTable::from_dataset(&dataset)?;
        debug!("{}", table.debug_dump());
        self.dataset = dataset;
        self.table = table;
        self.last_result = None;
        Ok(())
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn last_result(&self) -> Option<&LastResult> {
        self.last_result.as_ref()
    }

    /// Menu loop until `q`, Ctrl-C/Ctrl-D or end of input
    pub fn run(&mut self, source: &mut dyn LineSource) -> Result<()> {
        print_menu(self.dataset.name());

        loop {
            let Some(line) = source.read_line("lung")? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            let action = match MenuAction::parse(&line) {
                Ok(action) => action,
                Err(e) => {
                    report(&e);
                    continue;
                }
            };

            if self.execute(action, source)? == Flow::Quit {
                break;
            }
        }

        println!("\nGoodbye!");
        Ok(())
    }

    pub fn execute(&mut self, action: MenuAction, source: &mut dyn LineSource) -> Result<Flow> {
        match &action {
            MenuAction::Quit => return Ok(Flow::Quit),
            MenuAction::Help => print_menu(self.dataset.name()),
            MenuAction::Files => {
                if let Err(e) = print_data_files(&self.config) {
                    report(&e);
                }
            }
            MenuAction::Load(selection) => {
                let path = resolve_data_file(&self.config, selection);
                match self.load(&path) {
                    Ok(()) => println!(
                        "{}",
                        format!(
                            "Loaded '{}': {} records, {} columns",
                            self.dataset.name(),
                            self.dataset.rows().len(),
                            self.dataset.columns().len()
                        )
                        .green()
                    ),
                    Err(e) => report(&e),
                }
            }
            MenuAction::Export(target) => match self.export(target.as_deref()) {
                Ok(message) => println!("{}", message.green()),
                Err(e) => eprintln!("{}", format!("Export error: {}", e).red()),
            },
            MenuAction::Logs => self.print_logs(),
            _ => match self.answer(&action, source) {
                Ok(Some((title, result))) => {
                    self.show(&action, &title, &result);
                    self.last_result = Some(result);
                }
                Ok(None) => println!("{}", "Returning to menu".dim()),
                Err(e) => match e.downcast::<ExplorerError>() {
                    Ok(err) if err.is_recoverable() => {
                        warn!("Query failed: {}", err);
                        report(&err);
                    }
                    Ok(err) => return Err(err.into()),
                    Err(e) => return Err(e),
                },
            },
        }
        Ok(Flow::Continue)
    }

    /// Prompt for the question's parameters and run it. `None` when the
    /// user quits a prompt.
    fn answer(
        &self,
        action: &MenuAction,
        source: &mut dyn LineSource,
    ) -> Result<Option<(String, LastResult)>> {
        let rows = RowQueryEngine::new(&self.dataset);
        let grouped = GroupedQueryEngine::new(&self.table);
        let queries = &self.config.queries;

        let answer = match action {
            MenuAction::DemographicInfo => {
                let id = ask!(prompt_parsed(source, "Patient ID", parse_patient_id));
                (
                    format!("Demographics for patient {}", id),
                    LastResult::Records(rows.demographic_info(id)?),
                )
            }
            MenuAction::MedicalHistory => {
                let ethnicity = ask!(prompt_text(source, "ethnicity"));
                (
                    format!("Medical history for ethnicity matching '{}'", ethnicity),
                    LastResult::Records(rows.medical_history(&ethnicity)?),
                )
            }
            MenuAction::LongSurvival => {
                let months = ask!(prompt_parsed(source, "survival months", parse_threshold));
                (
                    format!("Patients surviving more than {} months", months),
                    LastResult::Records(rows.long_survival(months)?),
                )
            }
            MenuAction::HypertensionCohort => {
                let threshold =
                    ask!(prompt_parsed(source, "diastolic threshold", parse_threshold));
                (
                    format!(
                        "Patients with hypertension or diastolic pressure above {}",
                        threshold
                    ),
                    LastResult::Records(rows.hypertension_cohort(threshold)?),
                )
            }
            MenuAction::TopTreatments => {
                let ethnicity = ask!(prompt_text(source, "ethnicity"));
                let series = grouped.top_treatments(
                    &ethnicity,
                    queries.long_survival_months,
                    queries.top_treatments,
                )?;
                (
                    top_treatments_title(
                        &ethnicity,
                        queries.top_treatments,
                        queries.long_survival_months,
                    ),
                    LastResult::Frequencies(series),
                )
            }
            MenuAction::WhiteBloodCellCount => {
                let ethnicity = ask!(prompt_text(source, "ethnicity"));
                let treatment = ask!(prompt_text(source, "treatment"));
                let value = grouped.mean_white_blood_cell_count(&ethnicity, &treatment)?;
                let label = format!("Mean white blood cell count for {} / {}", ethnicity, treatment);
                (label.clone(), LastResult::Scalar { label, value })
            }
            MenuAction::PackYearsByLocationAndTreatment => {
                let pulse = ask!(prompt_parsed(source, "minimum pulse", parse_threshold));
                let size = ask!(prompt_parsed(source, "maximum tumor size (mm)", parse_threshold));
                (
                    format!(
                        "Mean pack-years by location and treatment (pulse > {}, tumor < {} mm)",
                        pulse, size
                    ),
                    LastResult::Aggregate(
                        grouped.mean_pack_years_by_location_and_treatment(pulse, size)?,
                    ),
                )
            }
            MenuAction::SurvivalAndBloodPressureByGender => {
                let gender = ask!(prompt_text(source, "gender"));
                (
                    format!("Mean survival and blood pressure for gender '{}'", gender),
                    LastResult::Aggregate(grouped.mean_survival_and_blood_pressure(&gender)?),
                )
            }
            MenuAction::TreatmentDistribution => {
                let ethnicity = ask!(prompt_text(source, "ethnicity"));
                (
                    format!("Treatment distribution for '{}'", ethnicity),
                    LastResult::Frequencies(grouped.treatment_distribution(&ethnicity)?),
                )
            }
            MenuAction::PackYearsByStageAndEthnicity => (
                "Mean pack-years by stage and ethnicity".to_string(),
                LastResult::Series(grouped.mean_pack_years_by_stage_and_ethnicity()?),
            ),
            MenuAction::BloodPressureByTreatment => (
                "Mean blood pressure by treatment".to_string(),
                LastResult::Aggregate(grouped.mean_blood_pressure_by_treatment()?),
            ),
            MenuAction::TreatmentsByInsurance => (
                "Treatment counts by insurance type".to_string(),
                LastResult::CrossTab(grouped.treatment_counts_by_insurance()?),
            ),
            other => return Err(anyhow!("{:?} is not a question", other)),
        };

        Ok(Some(answer))
    }

    fn show(&self, action: &MenuAction, title: &str, result: &LastResult) {
        let display = &self.config.display;
        match result {
            LastResult::Records(records) => {
                let limit = match action {
                    MenuAction::MedicalHistory => display.medical_history_limit,
                    _ => display.row_limit,
                };
                println!("{}", title.cyan().bold());
                table_renderer::print_result(records, limit);
                if records.len() > limit {
                    println!(
                        "{}",
                        format!("Showing {} of {} records", limit, records.len()).dim()
                    );
                }
            }
            LastResult::Frequencies(series) if *action == MenuAction::TreatmentDistribution => {
                result_display::display_distribution(title, series, display.bar_width)
            }
            LastResult::Series(table) => result_display::display_line_series(title, table),
            LastResult::Scalar { value, .. } => result_display::display_scalar(title, *value),
            other => {
                if let Some(provider) = other.provider() {
                    result_display::display_results(title, provider);
                }
            }
        }
    }

    fn export(&self, target: Option<&str>) -> Result<String> {
        let result = self
            .last_result
            .as_ref()
            .ok_or_else(|| anyhow!("No results to export. Run a query first."))?;

        let path = target
            .map(PathBuf::from)
            .unwrap_or_else(|| DataExporter::default_filename("csv"));
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            return match result {
                LastResult::Series(table) => {
                    DataExporter::export_to_json(&table.line_series(), &path)
                }
                other => DataExporter::export_to_json(other, &path),
            };
        }

        let provider = result
            .provider()
            .ok_or_else(|| anyhow!("A single value cannot be exported to CSV; use a .json file"))?;
        DataExporter::export_provider_to_csv(provider, &path)
    }

    fn print_logs(&self) {
        let Some(buffer) = get_log_buffer() else {
            println!("{}", "Logging is not initialised".yellow());
            return;
        };

        let entries = buffer.get_recent(LOG_LINES_SHOWN);
        if entries.is_empty() {
            println!("{}", "No log entries yet".yellow());
        }
        for entry in entries {
            println!("{}", entry.format_for_display());
        }
    }
}

fn top_treatments_title(ethnicity: &str, count: usize, months: f64) -> String {
    format!(
        "Top {} treatments for {} group - Survival > {} months",
        count,
        capitalise_words(ethnicity),
        months
    )
}

fn report(err: &ExplorerError) {
    eprintln!("{}", err.to_string().red());
}
