// src/features/columns.rs
//! Training-time column names of the fields the form collects.

pub const AGE: &str = "age";
pub const TIME_IN_HOSPITAL: &str = "time_in_hospital";
pub const NUM_LAB_PROCEDURES: &str = "num_lab_procedures";
pub const NUM_PROCEDURES: &str = "num_procedures";
pub const NUM_MEDICATIONS: &str = "num_medications";
pub const NUMBER_DIAGNOSES: &str = "number_diagnoses";
pub const NUMBER_EMERGENCY: &str = "number_emergency";
pub const INSULIN: &str = "insulin";
pub const DIABETES_MED: &str = "diabetesMed";
pub const A1C_RESULT: &str = "A1Cresult";
pub const MAX_GLU_SERUM: &str = "max_glu_serum";
pub const GENDER: &str = "gender";
pub const ADMISSION_TYPE_ID: &str = "admission_type_id";

pub const ALL: [&str; 13] = [
    AGE,
    TIME_IN_HOSPITAL,
    NUM_LAB_PROCEDURES,
    NUM_PROCEDURES,
    NUM_MEDICATIONS,
    NUMBER_DIAGNOSES,
    NUMBER_EMERGENCY,
    INSULIN,
    DIABETES_MED,
    A1C_RESULT,
    MAX_GLU_SERUM,
    GENDER,
    ADMISSION_TYPE_ID,
];
