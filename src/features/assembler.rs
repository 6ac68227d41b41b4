// src/features/assembler.rs
use log::debug;
use ndarray::Array1;

use super::columns;
use crate::bundle::FeatureSchema;
use crate::models::{AdmissionType, Gender, InsulinUsage, LabTier, RawInput};

/// Code for "test not performed" in the A1C and glucose columns.
pub const NOT_TESTED_CODE: f64 = -99.0;

/// How the two elevated tiers of a lab result are encoded.
///
/// The exported models were trained with both tiers collapsed to 1, which
/// loses the `>7`/`>8` and `>200`/`>300` distinction. `Preserved` keeps it
/// (second tier = 2) and only makes sense for a model trained that way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabTierEncoding {
    #[default]
    Collapsed,
    Preserved,
}

pub fn encode_lab_result(tier: LabTier, encoding: LabTierEncoding) -> f64 {
    match (tier, encoding) {
        (LabTier::NotTested, _) => NOT_TESTED_CODE,
        (LabTier::Normal, _) => 0.0,
        (LabTier::Elevated, _) => 1.0,
        (LabTier::SeverelyElevated, LabTierEncoding::Collapsed) => 1.0,
        (LabTier::SeverelyElevated, LabTierEncoding::Preserved) => 2.0,
    }
}

pub fn encode_insulin(insulin: InsulinUsage) -> f64 {
    if insulin.is_administered() {
        1.0
    } else {
        0.0
    }
}

pub fn encode_admission_type(admission: AdmissionType) -> f64 {
    match admission {
        AdmissionType::Emergency => 1.0,
        AdmissionType::Planned => 2.0,
        AdmissionType::Referral => 3.0,
        AdmissionType::Other => 5.0,
    }
}

pub fn encode_gender(gender: Gender) -> f64 {
    match gender {
        Gender::Female => 0.0,
        Gender::Male => 1.0,
    }
}

pub fn encode_flag(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

/// Column name and numeric code of every field the form collects.
pub fn encoded_fields(input: &RawInput, encoding: LabTierEncoding) -> [(&'static str, f64); 13] {
    [
        (columns::AGE, input.age.code() as f64),
        (columns::TIME_IN_HOSPITAL, input.time_in_hospital as f64),
        (columns::NUM_LAB_PROCEDURES, input.num_lab_procedures as f64),
        (columns::NUM_PROCEDURES, input.num_procedures as f64),
        (columns::NUM_MEDICATIONS, input.num_medications as f64),
        (columns::NUMBER_DIAGNOSES, input.num_diagnoses as f64),
        (columns::NUMBER_EMERGENCY, encode_flag(input.emergency)),
        (columns::INSULIN, encode_insulin(input.insulin)),
        (columns::DIABETES_MED, encode_flag(input.diabetes_med)),
        (
            columns::A1C_RESULT,
            encode_lab_result(input.a1c_result.tier(), encoding),
        ),
        (
            columns::MAX_GLU_SERUM,
            encode_lab_result(input.glucose_serum.tier(), encoding),
        ),
        (columns::GENDER, encode_gender(input.gender)),
        (
            columns::ADMISSION_TYPE_ID,
            encode_admission_type(input.admission_type),
        ),
    ]
}

/// One row, positionally indexed by the schema it was assembled against.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Array1<f64>,
}

impl FeatureVector {
    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, schema: &FeatureSchema, column: &str) -> Option<f64> {
        schema.position(column).map(|idx| self.values[idx])
    }
}

pub struct FeatureAssembler<'a> {
    schema: &'a FeatureSchema,
    encoding: LabTierEncoding,
}

impl<'a> FeatureAssembler<'a> {
    pub fn new(schema: &'a FeatureSchema, encoding: LabTierEncoding) -> Self {
        Self { schema, encoding }
    }

    /// Zero everywhere, form fields written into their schema positions.
    /// Fields whose column the schema does not list are skipped.
    pub fn assemble(&self, input: &RawInput) -> FeatureVector {
        let mut values = Array1::<f64>::zeros(self.schema.len());
        for (column, code) in encoded_fields(input, self.encoding) {
            match self.schema.position(column) {
                Some(idx) => values[idx] = code,
                None => debug!("Column '{}' not in feature schema, skipping", column),
            }
        }
        FeatureVector { values }
    }
}
