// src/inference/verdict.rs
//! Turns the model output into what the user sees.
//!
//! In `Parity` mode an elevated A1C or glucose result forces a high-risk
//! verdict whatever the model said, and the high-risk branch displays
//! `probabilities[0]` as the readmission probability. Both behaviors are
//! kept as deployed; `ModelOnly` drops them.

use serde::Serialize;
use std::str::FromStr;

use super::engine::ModelOutput;
use crate::models::{A1cResult, DisplayedVerdict, GlucoseSerumResult, OverrideTrigger, RiskLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideMode {
    #[default]
    Parity,
    ModelOnly,
}

impl OverrideMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverrideMode::Parity => "parity",
            OverrideMode::ModelOnly => "model_only",
        }
    }
}

impl FromStr for OverrideMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parity" => Ok(OverrideMode::Parity),
            "model_only" | "model-only" => Ok(OverrideMode::ModelOnly),
            other => Err(format!(
                "Unknown override mode '{}', expected 'parity' or 'model_only'",
                other
            )),
        }
    }
}

pub fn resolve_verdict(
    output: &ModelOutput,
    a1c: A1cResult,
    glucose: GlucoseSerumResult,
    mode: OverrideMode,
) -> DisplayedVerdict {
    let [p_no, p_yes] = output.probabilities;

    let mut triggers = Vec::new();
    if output.label == 1 {
        triggers.push(OverrideTrigger::ModelPrediction);
    }

    match mode {
        OverrideMode::Parity => {
            if a1c.is_elevated() {
                triggers.push(OverrideTrigger::ElevatedA1c);
            }
            if glucose.is_elevated() {
                triggers.push(OverrideTrigger::ElevatedGlucose);
            }
            if triggers.is_empty() {
                DisplayedVerdict {
                    risk: RiskLevel::Low,
                    readmission_pct: p_yes * 100.0,
                    no_readmission_pct: p_no * 100.0,
                    triggers,
                }
            } else {
                DisplayedVerdict {
                    risk: RiskLevel::High,
                    readmission_pct: p_no * 100.0,
                    no_readmission_pct: p_yes * 100.0,
                    triggers,
                }
            }
        }
        OverrideMode::ModelOnly => DisplayedVerdict {
            risk: if output.label == 1 {
                RiskLevel::High
            } else {
                RiskLevel::Low
            },
            readmission_pct: p_yes * 100.0,
            no_readmission_pct: p_no * 100.0,
            triggers,
        },
    }
}
