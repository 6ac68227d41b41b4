// src/models/patient.rs
//! Raw patient attributes as collected by the form.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Ten-year age bracket, kept as the 1-based code the model was trained on.
/// `[0-10)` is code 1, `[90-100)` is code 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AgeBracket(u8);

impl AgeBracket {
    pub const MIN_CODE: u8 = 1;
    pub const MAX_CODE: u8 = 10;

    pub fn from_code(code: u8) -> Option<Self> {
        if (Self::MIN_CODE..=Self::MAX_CODE).contains(&code) {
            Some(Self(code))
        } else {
            None
        }
    }

    pub fn code(&self) -> u8 {
        self.0
    }

    pub fn label(&self) -> String {
        let lower = (self.0 as u32 - 1) * 10;
        format!("[{}-{})", lower, lower + 10)
    }

    pub fn all() -> impl Iterator<Item = AgeBracket> {
        (Self::MIN_CODE..=Self::MAX_CODE).map(AgeBracket)
    }
}

impl Default for AgeBracket {
    fn default() -> Self {
        Self(Self::MIN_CODE)
    }
}

impl FromStr for AgeBracket {
    type Err = String;

    /// Accepts either the bracket label (`[70-80)`) or its code (`8`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<u8>() {
            return Self::from_code(code).ok_or_else(|| {
                format!(
                    "Age bracket code {} out of range [{}, {}]",
                    code,
                    Self::MIN_CODE,
                    Self::MAX_CODE
                )
            });
        }
        Self::all()
            .find(|bracket| bracket.label() == trimmed)
            .ok_or_else(|| format!("Unknown age bracket '{}'", trimmed))
    }
}

impl TryFrom<String> for AgeBracket {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AgeBracket> for String {
    fn from(bracket: AgeBracket) -> Self {
        bracket.label()
    }
}

/// Severity tier shared by the A1C and glucose serum tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabTier {
    NotTested,
    Normal,
    Elevated,
    SeverelyElevated,
}

impl LabTier {
    pub fn is_elevated(&self) -> bool {
        matches!(self, LabTier::Elevated | LabTier::SeverelyElevated)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum A1cResult {
    #[default]
    #[serde(rename = "None")]
    NotTested,
    #[serde(rename = "Norm")]
    Normal,
    #[serde(rename = ">7", alias = "> 7")]
    Above7,
    #[serde(rename = ">8", alias = "> 8")]
    Above8,
}

impl A1cResult {
    pub const ALL: [A1cResult; 4] = [
        A1cResult::NotTested,
        A1cResult::Normal,
        A1cResult::Above7,
        A1cResult::Above8,
    ];

    pub fn tier(&self) -> LabTier {
        match self {
            A1cResult::NotTested => LabTier::NotTested,
            A1cResult::Normal => LabTier::Normal,
            A1cResult::Above7 => LabTier::Elevated,
            A1cResult::Above8 => LabTier::SeverelyElevated,
        }
    }

    pub fn is_elevated(&self) -> bool {
        self.tier().is_elevated()
    }

    /// Wire value used by the form and the JSON API.
    pub fn as_str(&self) -> &'static str {
        match self {
            A1cResult::NotTested => "None",
            A1cResult::Normal => "Norm",
            A1cResult::Above7 => ">7",
            A1cResult::Above8 => ">8",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            A1cResult::NotTested => "Test Yok",
            A1cResult::Normal => "Normal",
            A1cResult::Above7 => ">7",
            A1cResult::Above8 => ">8",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GlucoseSerumResult {
    #[default]
    #[serde(rename = "None")]
    NotTested,
    #[serde(rename = "Norm")]
    Normal,
    #[serde(rename = ">200", alias = "> 200")]
    Above200,
    #[serde(rename = ">300", alias = "> 300")]
    Above300,
}

impl GlucoseSerumResult {
    pub const ALL: [GlucoseSerumResult; 4] = [
        GlucoseSerumResult::NotTested,
        GlucoseSerumResult::Normal,
        GlucoseSerumResult::Above200,
        GlucoseSerumResult::Above300,
    ];

    pub fn tier(&self) -> LabTier {
        match self {
            GlucoseSerumResult::NotTested => LabTier::NotTested,
            GlucoseSerumResult::Normal => LabTier::Normal,
            GlucoseSerumResult::Above200 => LabTier::Elevated,
            GlucoseSerumResult::Above300 => LabTier::SeverelyElevated,
        }
    }

    pub fn is_elevated(&self) -> bool {
        self.tier().is_elevated()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GlucoseSerumResult::NotTested => "None",
            GlucoseSerumResult::Normal => "Norm",
            GlucoseSerumResult::Above200 => ">200",
            GlucoseSerumResult::Above300 => ">300",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GlucoseSerumResult::NotTested => "Test Yok",
            GlucoseSerumResult::Normal => "Normal",
            GlucoseSerumResult::Above200 => ">200",
            GlucoseSerumResult::Above300 => ">300",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InsulinUsage {
    #[default]
    No,
    Steady,
    Up,
    Down,
}

impl InsulinUsage {
    pub const ALL: [InsulinUsage; 4] = [
        InsulinUsage::No,
        InsulinUsage::Steady,
        InsulinUsage::Up,
        InsulinUsage::Down,
    ];

    pub fn is_administered(&self) -> bool {
        !matches!(self, InsulinUsage::No)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InsulinUsage::No => "No",
            InsulinUsage::Steady => "Steady",
            InsulinUsage::Up => "Up",
            InsulinUsage::Down => "Down",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InsulinUsage::No => "Kullanılmıyor",
            InsulinUsage::Steady => "Sabit doz",
            InsulinUsage::Up => "Doz artırıldı",
            InsulinUsage::Down => "Doz azaltıldı",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    #[serde(rename = "Erkek")]
    Male,
    #[serde(rename = "Kadın", alias = "Kadin")]
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Erkek",
            Gender::Female => "Kadın",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AdmissionType {
    #[default]
    #[serde(rename = "Acil")]
    Emergency,
    #[serde(rename = "Planlı", alias = "Planli")]
    Planned,
    #[serde(rename = "Sevk")]
    Referral,
    #[serde(rename = "Diğer", alias = "Diger")]
    Other,
}

impl AdmissionType {
    pub const ALL: [AdmissionType; 4] = [
        AdmissionType::Emergency,
        AdmissionType::Planned,
        AdmissionType::Referral,
        AdmissionType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdmissionType::Emergency => "Acil",
            AdmissionType::Planned => "Planlı",
            AdmissionType::Referral => "Sevk",
            AdmissionType::Other => "Diğer",
        }
    }
}

/// Widget ranges of the numeric form fields.
pub const TIME_IN_HOSPITAL_RANGE: RangeInclusive<u32> = 1..=14;
pub const NUM_LAB_PROCEDURES_RANGE: RangeInclusive<u32> = 1..=120;
pub const NUM_PROCEDURES_RANGE: RangeInclusive<u32> = 0..=6;
pub const NUM_DIAGNOSES_RANGE: RangeInclusive<u32> = 1..=16;
pub const NUM_MEDICATIONS_RANGE: RangeInclusive<u32> = 1..=80;

/// Everything the user supplies for one prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    pub age: AgeBracket,
    pub time_in_hospital: u32,
    pub num_lab_procedures: u32,
    pub num_procedures: u32,
    pub num_diagnoses: u32,
    pub num_medications: u32,
    pub emergency: bool,
    pub insulin: InsulinUsage,
    pub diabetes_med: bool,
    pub a1c_result: A1cResult,
    pub glucose_serum: GlucoseSerumResult,
    pub gender: Gender,
    pub admission_type: AdmissionType,
}

impl Default for RawInput {
    /// Initial widget positions of the form.
    fn default() -> Self {
        Self {
            age: AgeBracket::default(),
            time_in_hospital: 1,
            num_lab_procedures: 45,
            num_procedures: 1,
            num_diagnoses: 8,
            num_medications: 15,
            emergency: false,
            insulin: InsulinUsage::default(),
            diabetes_med: false,
            a1c_result: A1cResult::default(),
            glucose_serum: GlucoseSerumResult::default(),
            gender: Gender::default(),
            admission_type: AdmissionType::default(),
        }
    }
}

impl RawInput {
    /// Checks the numeric fields against the form widget ranges.
    /// Returns every violation, not just the first.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let checks: [(&str, u32, &RangeInclusive<u32>); 5] = [
            ("time_in_hospital", self.time_in_hospital, &TIME_IN_HOSPITAL_RANGE),
            ("num_lab_procedures", self.num_lab_procedures, &NUM_LAB_PROCEDURES_RANGE),
            ("num_procedures", self.num_procedures, &NUM_PROCEDURES_RANGE),
            ("num_diagnoses", self.num_diagnoses, &NUM_DIAGNOSES_RANGE),
            ("num_medications", self.num_medications, &NUM_MEDICATIONS_RANGE),
        ];

        let errors: Vec<String> = checks
            .iter()
            .filter(|(_, value, range)| !range.contains(value))
            .map(|(name, value, range)| {
                format!(
                    "{} {} out of range [{}, {}]",
                    name,
                    value,
                    range.start(),
                    range.end()
                )
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
