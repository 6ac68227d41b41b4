// src/features/mod.rs
pub mod assembler;
pub mod columns;

pub use assembler::{
    encode_admission_type, encode_flag, encode_gender, encode_insulin, encode_lab_result,
    encoded_fields, FeatureAssembler, FeatureVector, LabTierEncoding,
};
