//! Header names used by the canned queries.
//!
//! The loader never requires these; a query that needs a column the file
//! lacks fails with `MissingColumn`.

pub const PATIENT_ID: &str = "Patient_ID";
pub const AGE: &str = "Age";
pub const GENDER: &str = "Gender";
pub const ETHNICITY: &str = "Ethnicity";
pub const SMOKING_HISTORY: &str = "Smoking_History";
pub const SMOKING_PACK_YEARS: &str = "Smoking_Pack_Years";
pub const STAGE: &str = "Stage";
pub const TUMOR_SIZE_MM: &str = "Tumor_Size_mm";
pub const TUMOR_LOCATION: &str = "Tumor_Location";
pub const TREATMENT: &str = "Treatment";
pub const SURVIVAL_MONTHS: &str = "Survival_Months";
pub const FAMILY_HISTORY: &str = "Family_History";
pub const COMORBIDITY_DIABETES: &str = "Comorbidity_Diabetes";
pub const COMORBIDITY_HYPERTENSION: &str = "Comorbidity_Hypertension";
pub const COMORBIDITY_KIDNEY_DISEASE: &str = "Comorbidity_Kidney_Disease";
pub const COMORBIDITY_CHRONIC_LUNG_DISEASE: &str = "Comorbidity_Chronic_Lung_Disease";
pub const HAEMOGLOBIN_LEVEL: &str = "Haemoglobin_Level";
pub const BLOOD_PRESSURE_SYSTOLIC: &str = "Blood_Pressure_Systolic";
pub const BLOOD_PRESSURE_DIASTOLIC: &str = "Blood_Pressure_Diastolic";
pub const BLOOD_PRESSURE_PULSE: &str = "Blood_Pressure_Pulse";
pub const WHITE_BLOOD_CELL_COUNT: &str = "White_Blood_Cell_Count";
pub const INSURANCE_TYPE: &str = "Insurance_Type";
pub const PERFORMANCE_STATUS: &str = "Performance_Status";
