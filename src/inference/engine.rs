// src/inference/engine.rs
use anyhow::Context;
use chrono::Utc;
use log::{debug, info};
use std::sync::Arc;
use uuid::Uuid;

use super::recommendations::recommendations_for;
use super::risk_factors::identify_risk_factors;
use super::verdict::{resolve_verdict, OverrideMode};
use crate::bundle::ModelBundle;
use crate::error::{InferenceError, PipelineStage};
use crate::features::{FeatureAssembler, FeatureVector, LabTierEncoding};
use crate::models::{PredictionResult, RawInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InferenceSettings {
    pub lab_tier_encoding: LabTierEncoding,
    pub override_mode: OverrideMode,
}

/// Raw classifier output for one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelOutput {
    pub label: u8,
    /// `[no readmission, readmission]`.
    pub probabilities: [f64; 2],
}

/// Runs predictions against a shared, read-only bundle.
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    bundle: Arc<ModelBundle>,
    settings: InferenceSettings,
}

impl InferenceEngine {
    pub fn new(bundle: Arc<ModelBundle>, settings: InferenceSettings) -> Self {
        Self { bundle, settings }
    }

    pub fn bundle(&self) -> &ModelBundle {
        &self.bundle
    }

    pub fn settings(&self) -> InferenceSettings {
        self.settings
    }

    pub fn assemble(&self, input: &RawInput) -> FeatureVector {
        FeatureAssembler::new(&self.bundle.schema, self.settings.lab_tier_encoding).assemble(input)
    }

    /// scaler → reducer → classifier.
    pub fn run_model(&self, features: &FeatureVector) -> Result<ModelOutput, InferenceError> {
        let scaled = self
            .bundle
            .scaler
            .transform(features.values())
            .context("Scaler transform failed")
            .map_err(|e| InferenceError::new(PipelineStage::Scaling, e))?;

        let reduced = self
            .bundle
            .reducer
            .transform(&scaled)
            .context("Principal component projection failed")
            .map_err(|e| InferenceError::new(PipelineStage::Reduction, e))?;
        if let Some(idx) = reduced.iter().position(|v| !v.is_finite()) {
            return Err(InferenceError::new(
                PipelineStage::Reduction,
                anyhow::anyhow!("Component {} of the projected vector is not finite", idx),
            ));
        }

        let probabilities = self
            .bundle
            .classifier
            .predict_proba(&reduced)
            .context("Classifier prediction failed")
            .map_err(|e| InferenceError::new(PipelineStage::Classification, e))?;
        let label = crate::bundle::classifier::label_from_proba(&probabilities);

        debug!(
            "Model output: label={}, probabilities=[{:.4}, {:.4}]",
            label, probabilities[0], probabilities[1]
        );
        Ok(ModelOutput {
            label,
            probabilities,
        })
    }

    pub fn predict(&self, input: &RawInput) -> Result<PredictionResult, InferenceError> {
        let prediction_id = Uuid::new_v4();
        let features = self.assemble(input);
        let output = self.run_model(&features)?;

        let threshold = self.bundle.threshold.value;
        let threshold_label = u8::from(output.probabilities[1] >= threshold);
        let verdict = resolve_verdict(
            &output,
            input.a1c_result,
            input.glucose_serum,
            self.settings.override_mode,
        );
        let risk_factors = identify_risk_factors(input);
        let recommendations = recommendations_for(verdict.risk);

        info!(
            "Prediction {}: model_label={}, p_readmission={:.4}, verdict={:?}, triggers={:?}, risk_factors={}",
            prediction_id,
            output.label,
            output.probabilities[1],
            verdict.risk,
            verdict.triggers,
            risk_factors.len()
        );

        Ok(PredictionResult {
            prediction_id,
            predicted_at: Utc::now(),
            model_label: output.label,
            probabilities: output.probabilities,
            threshold,
            threshold_label,
            verdict,
            risk_factors,
            recommendations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::RiskFactor;
    use crate::models::{A1cResult, AgeBracket, GlucoseSerumResult, InsulinUsage, RiskLevel};
    use crate::test_support::{engine, overflowing_engine, sigmoid};

    #[test]
    fn test_no_labs_and_negative_model_is_low_risk() {
        let engine = engine(-1.0, InferenceSettings::default());
        let input = RawInput {
            a1c_result: A1cResult::NotTested,
            glucose_serum: GlucoseSerumResult::NotTested,
            ..RawInput::default()
        };

        let result = engine.predict(&input).unwrap();
        assert_eq!(result.model_label, 0);
        assert_eq!(result.verdict.risk, RiskLevel::Low);
        assert!((result.verdict.readmission_pct - result.probabilities[1] * 100.0).abs() < 1e-9);
        assert!((result.probabilities[1] - sigmoid(-1.0)).abs() < 1e-12);
        assert_eq!(result.recommendations.title, "Düşük Risk İçin Öneriler");
    }

    #[test]
    fn test_elevated_a1c_overrides_negative_model() {
        let engine = engine(-1.0, InferenceSettings::default());
        let input = RawInput {
            a1c_result: A1cResult::Above7,
            ..RawInput::default()
        };

        let result = engine.predict(&input).unwrap();
        assert_eq!(result.model_label, 0);
        assert_eq!(result.verdict.risk, RiskLevel::High);
        assert!((result.verdict.readmission_pct - result.probabilities[0] * 100.0).abs() < 1e-9);
        assert_eq!(result.recommendations.title, "Yüksek Risk İçin Öneriler");
    }

    #[test]
    fn test_end_to_end_risk_factors_without_override() {
        let input = RawInput {
            age: "[70-80)".parse::<AgeBracket>().unwrap(),
            time_in_hospital: 10,
            num_lab_procedures: 90,
            num_medications: 40,
            insulin: InsulinUsage::Steady,
            a1c_result: A1cResult::Normal,
            glucose_serum: GlucoseSerumResult::Normal,
            ..RawInput::default()
        };

        for (intercept, expected) in [(-1.0, RiskLevel::Low), (1.0, RiskLevel::High)] {
            let result = engine(intercept, InferenceSettings::default())
                .predict(&input)
                .unwrap();
            for factor in [
                RiskFactor::HighAge,
                RiskFactor::LongStay,
                RiskFactor::HighLabProcedureCount,
                RiskFactor::HighMedicationCount,
                RiskFactor::InsulinUse,
            ] {
                assert!(result.risk_factors.contains(&factor), "missing {:?}", factor);
            }
            assert!(!result.risk_factors.contains(&RiskFactor::ElevatedA1c));
            assert_eq!(result.verdict.risk, expected);
            assert_eq!(result.model_label, u8::from(expected == RiskLevel::High));
        }
    }

    #[test]
    fn test_threshold_label_is_reported_separately() {
        let engine = engine(-1.0, InferenceSettings::default());
        let result = engine.predict(&RawInput::default()).unwrap();
        // sigmoid(-1) ~ 0.27, below the default 0.5 threshold.
        assert_eq!(result.threshold, 0.5);
        assert_eq!(result.threshold_label, 0);
    }

    #[test]
    fn test_feature_vector_flows_through_pipeline() {
        let engine = engine(0.0, InferenceSettings::default());
        let features = engine.assemble(&RawInput::default());
        assert_eq!(features.len(), engine.bundle().schema.len());

        let output = engine.run_model(&features).unwrap();
        assert_eq!(output.probabilities, [0.5, 0.5]);
        assert_eq!(output.label, 0);
    }

    #[test]
    fn test_model_only_setting_disables_override() {
        let engine = engine(
            -1.0,
            InferenceSettings {
                override_mode: OverrideMode::ModelOnly,
                ..InferenceSettings::default()
            },
        );
        let result = engine
            .predict(&RawInput {
                a1c_result: A1cResult::Above8,
                ..RawInput::default()
            })
            .unwrap();
        assert_eq!(result.verdict.risk, RiskLevel::Low);
        assert!(result.risk_factors.contains(&RiskFactor::ElevatedA1c));
    }

    #[test]
    fn test_non_finite_projection_fails_in_reduction_stage() {
        let failing = overflowing_engine();
        match failing.predict(&RawInput::default()) {
            Err(e) => {
                assert_eq!(e.stage, PipelineStage::Reduction);
                assert!(e.diagnostic().contains("is not finite"));
            }
            Ok(result) => panic!("expected reduction failure, got {:?}", result.verdict),
        }
    }
}
