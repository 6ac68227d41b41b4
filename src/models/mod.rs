pub mod patient;
pub mod prediction;

pub use patient::{
    A1cResult, AdmissionType, AgeBracket, Gender, GlucoseSerumResult, InsulinUsage, LabTier,
    RawInput,
};
pub use prediction::{DisplayedVerdict, OverrideTrigger, PredictionResult, RiskLevel};
