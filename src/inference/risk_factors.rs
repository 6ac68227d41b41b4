// src/inference/risk_factors.rs
//! Fixed-threshold checklist shown next to the verdict. Illustrative only,
//! the model plays no part in it.

use serde::{Serialize, Serializer};

use crate::models::RawInput;

pub const HIGH_AGE_MIN_CODE: u8 = 7;
pub const LONG_STAY_MIN_DAYS: u32 = 10;
pub const HIGH_LAB_PROCEDURES_MIN: u32 = 90;
pub const HIGH_MEDICATIONS_MIN: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskFactor {
    HighAge,
    LongStay,
    HighLabProcedureCount,
    HighMedicationCount,
    ElevatedA1c,
    InsulinUse,
}

impl RiskFactor {
    pub fn label(&self) -> &'static str {
        match self {
            RiskFactor::HighAge => "Yüksek yaş",
            RiskFactor::LongStay => "Uzun hastanede kalış süresi",
            RiskFactor::HighLabProcedureCount => "Yüksek laboratuvar işlem sayısı",
            RiskFactor::HighMedicationCount => "Yüksek ilaç sayısı",
            RiskFactor::ElevatedA1c => "Yüksek A1C değeri",
            RiskFactor::InsulinUse => "İnsülin kullanımı",
        }
    }
}

impl Serialize for RiskFactor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

pub fn identify_risk_factors(input: &RawInput) -> Vec<RiskFactor> {
    let checks = [
        (input.age.code() >= HIGH_AGE_MIN_CODE, RiskFactor::HighAge),
        (input.time_in_hospital >= LONG_STAY_MIN_DAYS, RiskFactor::LongStay),
        (
            input.num_lab_procedures >= HIGH_LAB_PROCEDURES_MIN,
            RiskFactor::HighLabProcedureCount,
        ),
        (
            input.num_medications >= HIGH_MEDICATIONS_MIN,
            RiskFactor::HighMedicationCount,
        ),
        (input.a1c_result.is_elevated(), RiskFactor::ElevatedA1c),
        (input.insulin.is_administered(), RiskFactor::InsulinUse),
    ];

    checks
        .into_iter()
        .filter_map(|(triggered, factor)| triggered.then_some(factor))
        .collect()
}
