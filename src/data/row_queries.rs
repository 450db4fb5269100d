//! Row-store query engine
//!
//! Each query scans the full row list once, matches rows with a
//! [`Predicate`] and projects a fixed set of columns per match.

use crate::data::columns::*;
use crate::data::dataset::Dataset;
use crate::data::predicate::{filter_rows, Predicate};
use crate::data::results::{Projection, QueryResult};
use crate::error::{ExplorerError, Result};
use tracing::{debug, info};

pub const DEMOGRAPHIC_COLUMNS: [&str; 4] = [AGE, GENDER, SMOKING_HISTORY, ETHNICITY];

pub const MEDICAL_HISTORY_COLUMNS: [&str; 4] = [
    FAMILY_HISTORY,
    COMORBIDITY_DIABETES,
    COMORBIDITY_KIDNEY_DISEASE,
    HAEMOGLOBIN_LEVEL,
];

pub const LONG_SURVIVAL_COLUMNS: [&str; 4] = [AGE, TUMOR_SIZE_MM, TUMOR_LOCATION, STAGE];

pub const HYPERTENSION_COLUMNS: [&str; 4] = [
    TREATMENT,
    INSURANCE_TYPE,
    PERFORMANCE_STATUS,
    COMORBIDITY_CHRONIC_LUNG_DISEASE,
];

/// Query engine over the raw row store
pub struct RowQueryEngine<'a> {
    dataset: &'a Dataset,
}

impl<'a> RowQueryEngine<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Demographics for a patient ID. No match is `NotFound`, not an empty
    /// result.
    pub fn demographic_info(&self, patient_id: i64) -> Result<QueryResult> {
        info!("Demographic lookup for patient {}", patient_id);
        let result = self.select(
            &Predicate::int_equals(PATIENT_ID, patient_id),
            &DEMOGRAPHIC_COLUMNS,
        )?;

        if result.is_empty() {
            return Err(ExplorerError::NotFound(format!(
                "Patient ID {} not found!",
                patient_id
            )));
        }
        Ok(result)
    }

    /// Medical history for every patient whose ethnicity contains `ethnicity`,
    /// ignoring case
    pub fn medical_history(&self, ethnicity: &str) -> Result<QueryResult> {
        info!("Medical history for ethnicity matching '{}'", ethnicity);
        self.select(
            &Predicate::contains_ignore_case(ETHNICITY, ethnicity.trim()),
            &MEDICAL_HISTORY_COLUMNS,
        )
    }

    /// Patients who survived strictly longer than `months`
    pub fn long_survival(&self, months: f64) -> Result<QueryResult> {
        info!("Long survival filter: Survival_Months > {}", months);
        self.select(
            &Predicate::greater_than(SURVIVAL_MONTHS, months),
            &LONG_SURVIVAL_COLUMNS,
        )
    }

    /// Patients flagged with hypertension OR with a diastolic pressure above
    /// `diastolic_threshold`
    pub fn hypertension_cohort(&self, diastolic_threshold: f64) -> Result<QueryResult> {
        info!(
            "Hypertension cohort: flag set or diastolic > {}",
            diastolic_threshold
        );
        let predicate = Predicate::truthy(COMORBIDITY_HYPERTENSION).or(Predicate::greater_than(
            BLOOD_PRESSURE_DIASTOLIC,
            diastolic_threshold,
        ));
        self.select(&predicate, &HYPERTENSION_COLUMNS)
    }

    /// Scan with `predicate` and project `columns` from each match
    pub fn select(&self, predicate: &Predicate, columns: &[&str]) -> Result<QueryResult> {
        let index = self.dataset.columns();
        let positions = columns
            .iter()
            .map(|c| index.require(c))
            .collect::<Result<Vec<_>>>()?;

        let mut result = QueryResult::new(columns);
        for row in filter_rows(self.dataset, predicate)? {
            let projection: Projection = columns
                .iter()
                .zip(positions.iter())
                .map(|(name, &col)| (*name, self.dataset.field(row, col)))
                .collect();
            result.records.push(projection);
        }

        debug!("Row query returned {} records", result.len());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        let csv = "Patient_ID,Age,Gender,Smoking_History,Ethnicity\n\
                   7,45,Male,Former Smoker,Caucasian\n\
                   8,61,Female,Never Smoked,Hispanic\n";
        Dataset::from_reader("t", csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_demographic_info_projects_four_columns() {
        let data = dataset();
        let result = RowQueryEngine::new(&data).demographic_info(7).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.columns, DEMOGRAPHIC_COLUMNS);
        assert_eq!(result.records[0].get("Smoking_History"), Some("Former Smoker"));
    }

    #[test]
    fn test_demographic_info_missing_id() {
        let data = dataset();
        let err = RowQueryEngine::new(&data).demographic_info(99).unwrap_err();
        assert!(matches!(err, ExplorerError::NotFound(_)));
    }

    #[test]
    fn test_select_unknown_column() {
        let data = dataset();
        let err = RowQueryEngine::new(&data)
            .select(&Predicate::truthy(GENDER), &["Stage"])
            .unwrap_err();
        assert!(matches!(err, ExplorerError::MissingColumn(c) if c == "Stage"));
    }
}
