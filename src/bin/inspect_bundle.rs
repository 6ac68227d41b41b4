// src/bin/inspect_bundle.rs
//! Loads a model bundle, prints its summary and optionally scores one
//! JSON-encoded patient without starting the server.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use readmission_lib::bundle::{BundlePaths, ModelBundle};
use readmission_lib::features::LabTierEncoding;
use readmission_lib::inference::{InferenceEngine, InferenceSettings, OverrideMode};
use readmission_lib::models::RawInput;
use readmission_lib::utils::env::load_env;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct InspectArgs {
    /// Directory holding the model artifacts
    #[arg(long, default_value = "models")]
    model_dir: PathBuf,

    /// Score the patient described in this JSON file
    #[arg(long)]
    predict_json: Option<PathBuf>,

    /// Encode >8 / >300 lab results with their own code
    #[arg(long)]
    preserve_lab_tiers: bool,

    /// parity or model_only
    #[arg(long, default_value = "parity")]
    override_mode: OverrideMode,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    load_env();
    let args = InspectArgs::parse();

    let paths = BundlePaths::in_dir(&args.model_dir);
    let bundle = ModelBundle::load(&paths)
        .with_context(|| format!("Model bundle in {} is unusable", args.model_dir.display()))?;
    println!("{}", bundle.summary());

    let Some(input_path) = args.predict_json else {
        return Ok(());
    };

    let raw = fs::read_to_string(&input_path)
        .with_context(|| format!("Failed to read {}", input_path.display()))?;
    let input: RawInput = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse patient JSON in {}", input_path.display()))?;
    if let Err(problems) = input.validate() {
        for problem in &problems {
            warn!("{}", problem);
        }
        anyhow::bail!("{} field(s) out of range", problems.len());
    }

    let settings = InferenceSettings {
        lab_tier_encoding: if args.preserve_lab_tiers {
            LabTierEncoding::Preserved
        } else {
            LabTierEncoding::Collapsed
        },
        override_mode: args.override_mode,
    };
    let engine = InferenceEngine::new(Arc::new(bundle), settings);

    let features = engine.assemble(&input);
    info!("Feature vector: {:?}", features.values().to_vec());

    let result = engine
        .predict(&input)
        .map_err(|e| anyhow::anyhow!(e.diagnostic()))?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
