//! Grouped-table query engine
//!
//! Answers the treatment/blood-pressure questions with group-by, mean and
//! value-count operations over the typed table. Category parameters are
//! title-cased before matching since the dataset stores them that way.

use crate::data::columns::*;
use crate::data::datatable::DataTable;
use crate::data::group_by::{mean_of, value_counts, GroupBy};
use crate::data::predicate::{filter_rows, Predicate};
use crate::data::results::{AggregateTable, CrossTab, FrequencySeries};
use crate::data::table_source::TableSource;
use crate::error::{ExplorerError, Result};
use crate::utils::text::capitalise_words;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Survival cut-off for the top-treatments question
pub const LONG_SURVIVAL_MONTHS: f64 = 100.0;

/// How many treatments the top-treatments question reports
pub const TOP_TREATMENTS: usize = 3;

pub struct GroupedQueryEngine<'a> {
    table: &'a DataTable,
}

impl<'a> GroupedQueryEngine<'a> {
    pub fn new(table: &'a DataTable) -> Self {
        Self { table }
    }

    fn all_rows(&self) -> Vec<usize> {
        (0..self.table.row_count()).collect()
    }

    /// Distinct values of a categorical column
    pub fn known_values(&self, column: &str) -> Result<Vec<String>> {
        let col = self.table.column_position(column)?;
        Ok(self.table.distinct_values(col))
    }

    fn require_known(&self, column: &'static str, value: &str) -> Result<()> {
        if self.known_values(column)?.iter().any(|v| v == value) {
            Ok(())
        } else {
            Err(ExplorerError::unknown(column, value))
        }
    }

    /// Most frequent treatments among patients of `ethnicity` who survived
    /// longer than `min_survival` months. Equal counts keep the order in which
    /// the treatments were first seen.
    pub fn top_treatments(
        &self,
        ethnicity: &str,
        min_survival: f64,
        top: usize,
    ) -> Result<FrequencySeries> {
        let ethnicity = capitalise_words(ethnicity);
        info!(
            "Top {} treatments for {} with survival > {} months",
            top, ethnicity, min_survival
        );

        let long_term = filter_rows(
            self.table,
            &Predicate::greater_than(SURVIVAL_MONTHS, min_survival),
        )?;
        let groups = GroupBy::new(self.table, &long_term, &[ETHNICITY])?;
        let group = groups
            .get_group(&[ethnicity.as_str()])
            .ok_or_else(|| ExplorerError::unknown(ETHNICITY, ethnicity.as_str()))?;

        Ok(value_counts(self.table, &group.rows, TREATMENT)?.head(top))
    }

    /// Mean white blood cell count for one treatment inside one ethnic group
    pub fn mean_white_blood_cell_count(&self, ethnicity: &str, treatment: &str) -> Result<f64> {
        let ethnicity = capitalise_words(ethnicity);
        let treatment = capitalise_words(treatment);
        info!(
            "Mean white blood cell count for {} in {} group",
            treatment, ethnicity
        );

        self.require_known(TREATMENT, &treatment)?;

        let by_ethnicity = GroupBy::new(self.table, &self.all_rows(), &[ETHNICITY])?;
        let ethnic_group = by_ethnicity
            .get_group(&[ethnicity.as_str()])
            .ok_or_else(|| ExplorerError::unknown(ETHNICITY, ethnicity.as_str()))?;

        let by_treatment = GroupBy::new(self.table, &ethnic_group.rows, &[TREATMENT])?;
        let treated = by_treatment
            .get_group(&[treatment.as_str()])
            .ok_or_else(|| {
                ExplorerError::NotFound(format!(
                    "No {} patients received {}",
                    ethnicity, treatment
                ))
            })?;

        let col = self.table.column_position(WHITE_BLOOD_CELL_COUNT)?;
        mean_of(self.table, &treated.rows, col)?.ok_or_else(|| {
            ExplorerError::NotFound(format!(
                "No {} values for {} in {} group",
                WHITE_BLOOD_CELL_COUNT, treatment, ethnicity
            ))
        })
    }

    /// Mean pack-years per (tumor location, treatment) for patients with a
    /// pulse above `min_pulse` and a tumor smaller than `max_tumor_size`
    pub fn mean_pack_years_by_location_and_treatment(
        &self,
        min_pulse: f64,
        max_tumor_size: f64,
    ) -> Result<AggregateTable> {
        info!(
            "Mean pack-years by location/treatment: pulse > {}, tumor < {}",
            min_pulse, max_tumor_size
        );
        let predicate = Predicate::greater_than(BLOOD_PRESSURE_PULSE, min_pulse)
            .and(Predicate::less_than(TUMOR_SIZE_MM, max_tumor_size));
        let rows = filter_rows(self.table, &predicate)?;

        GroupBy::new(self.table, &rows, &[TUMOR_LOCATION, TREATMENT])?
            .mean(self.table, &[SMOKING_PACK_YEARS])
    }

    /// Mean survival and blood pressure per (treatment, stage) for one gender
    pub fn mean_survival_and_blood_pressure(&self, gender: &str) -> Result<AggregateTable> {
        let gender = capitalise_words(gender);
        info!("Mean survival and blood pressure for gender {}", gender);

        self.require_known(GENDER, &gender)?;

        let means = GroupBy::new(self.table, &self.all_rows(), &[GENDER, TREATMENT, STAGE])?
            .mean(
                self.table,
                &[
                    SURVIVAL_MONTHS,
                    BLOOD_PRESSURE_DIASTOLIC,
                    BLOOD_PRESSURE_SYSTOLIC,
                ],
            )?;

        Ok(means.select_level(0, &gender))
    }

    /// Treatment frequencies within one ethnic group (pie-chart shape)
    pub fn treatment_distribution(&self, ethnicity: &str) -> Result<FrequencySeries> {
        let ethnicity = capitalise_words(ethnicity);
        info!("Treatment distribution for {} group", ethnicity);

        let groups = GroupBy::new(self.table, &self.all_rows(), &[ETHNICITY])?;
        let group = groups
            .get_group(&[ethnicity.as_str()])
            .ok_or_else(|| ExplorerError::unknown(ETHNICITY, ethnicity.as_str()))?;

        value_counts(self.table, &group.rows, TREATMENT)
    }

    /// Mean pack-years per (ethnicity, stage), long form. Split with
    /// [`AggregateTable::line_series`] for one line per ethnicity.
    pub fn mean_pack_years_by_stage_and_ethnicity(&self) -> Result<AggregateTable> {
        info!("Mean pack-years by stage and ethnicity");
        GroupBy::new(self.table, &self.all_rows(), &[ETHNICITY, STAGE])?
            .mean(self.table, &[SMOKING_PACK_YEARS])
    }

    pub fn mean_blood_pressure_by_treatment(&self) -> Result<AggregateTable> {
        info!("Mean blood pressure by treatment");
        GroupBy::new(self.table, &self.all_rows(), &[TREATMENT])?.mean(
            self.table,
            &[
                BLOOD_PRESSURE_SYSTOLIC,
                BLOOD_PRESSURE_DIASTOLIC,
                BLOOD_PRESSURE_PULSE,
            ],
        )
    }

    /// Treatment x insurance type counts, treatments sorted by name and every
    /// count list aligned to the sorted insurance labels
    pub fn treatment_counts_by_insurance(&self) -> Result<CrossTab> {
        info!("Treatment counts by insurance type");
        let mut column_labels = self.known_values(INSURANCE_TYPE)?;
        column_labels.sort();

        let pairs = GroupBy::new(self.table, &self.all_rows(), &[TREATMENT, INSURANCE_TYPE])?;

        let mut counts: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for group in pairs.groups() {
            let (treatment, insurance) = (&group.key[0], &group.key[1]);
            let slots = counts
                .entry(treatment.clone())
                .or_insert_with(|| vec![0; column_labels.len()]);
            if let Some(idx) = column_labels.iter().position(|l| l == insurance) {
                slots[idx] = group.rows.len();
            }
        }

        debug!(
            "Cross-tab: {} treatments x {} insurance types",
            counts.len(),
            column_labels.len()
        );

        Ok(CrossTab {
            row_column: TREATMENT.to_string(),
            column_column: INSURANCE_TYPE.to_string(),
            column_labels,
            counts,
        })
    }
}
