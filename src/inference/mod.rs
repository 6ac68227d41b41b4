// src/inference/mod.rs
//! Prediction pipeline: feature assembly, scaler → reducer → classifier,
//! verdict override, risk factors and recommendations.

pub mod engine;
pub mod recommendations;
pub mod risk_factors;
pub mod verdict;

pub use engine::{InferenceEngine, InferenceSettings, ModelOutput};
pub use recommendations::{recommendations_for, Recommendations};
pub use risk_factors::{identify_risk_factors, RiskFactor};
pub use verdict::{resolve_verdict, OverrideMode};
