// src/models/prediction.rs
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::inference::recommendations::Recommendations;
use crate::inference::risk_factors::RiskFactor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    High,
    Low,
}

impl RiskLevel {
    pub fn headline(&self) -> &'static str {
        match self {
            RiskLevel::High => "Hastanın 30 gün içinde yeniden yatış riski YÜKSEK!",
            RiskLevel::Low => "Hastanın 30 gün içinde yeniden yatış riski DÜŞÜK.",
        }
    }
}

/// Reason the displayed verdict was set to high risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideTrigger {
    ModelPrediction,
    ElevatedA1c,
    ElevatedGlucose,
}

impl OverrideTrigger {
    pub fn description(&self) -> &'static str {
        match self {
            OverrideTrigger::ModelPrediction => "Model tahmini pozitif",
            OverrideTrigger::ElevatedA1c => "A1C sonucu yüksek (>7 veya >8)",
            OverrideTrigger::ElevatedGlucose => "Glukoz serum sonucu yüksek (>200 veya >300)",
        }
    }
}

/// What the user is shown, which is not always what the model said.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayedVerdict {
    pub risk: RiskLevel,
    /// Percentage, 0..=100.
    pub readmission_pct: f64,
    pub no_readmission_pct: f64,
    pub triggers: Vec<OverrideTrigger>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    pub prediction_id: Uuid,
    pub predicted_at: DateTime<Utc>,
    /// Classifier's own label (argmax of `probabilities`).
    pub model_label: u8,
    /// `[no readmission, readmission]`.
    pub probabilities: [f64; 2],
    pub threshold: f64,
    /// `probabilities[1] >= threshold`.
    pub threshold_label: u8,
    pub verdict: DisplayedVerdict,
    pub risk_factors: Vec<RiskFactor>,
    pub recommendations: &'static Recommendations,
}
