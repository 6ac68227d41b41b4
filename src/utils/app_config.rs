// src/utils/app_config.rs
use log::{info, warn};
use std::env;
use std::path::PathBuf;

use crate::bundle::BundlePaths;
use crate::features::LabTierEncoding;
use crate::inference::{InferenceSettings, OverrideMode};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8501";
pub const DEFAULT_MODEL_DIR: &str = "models";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub model_dir: PathBuf,
    /// Per-artifact overrides; `None` means `<model_dir>/<default file name>`.
    pub classifier_path: Option<PathBuf>,
    pub reducer_path: Option<PathBuf>,
    pub scaler_path: Option<PathBuf>,
    pub feature_names_path: Option<PathBuf>,
    pub threshold_path: Option<PathBuf>,
    pub preserve_lab_tiers: bool,
    pub override_mode: OverrideMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            classifier_path: None,
            reducer_path: None,
            scaler_path: None,
            feature_names_path: None,
            threshold_path: None,
            preserve_lab_tiers: false,
            override_mode: OverrideMode::Parity,
        }
    }
}

impl AppConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let override_mode = match env::var("RISK_OVERRIDE_MODE") {
            Ok(raw) => raw.parse::<OverrideMode>().unwrap_or_else(|e| {
                warn!("{}. Falling back to 'parity'.", e);
                OverrideMode::Parity
            }),
            Err(_) => OverrideMode::Parity,
        };

        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            model_dir: PathBuf::from(
                env::var("MODEL_DIR").unwrap_or_else(|_| DEFAULT_MODEL_DIR.to_string()),
            ),
            classifier_path: env::var("CLASSIFIER_PATH").ok().map(PathBuf::from),
            reducer_path: env::var("REDUCER_PATH").ok().map(PathBuf::from),
            scaler_path: env::var("SCALER_PATH").ok().map(PathBuf::from),
            feature_names_path: env::var("FEATURE_NAMES_PATH").ok().map(PathBuf::from),
            threshold_path: env::var("THRESHOLD_PATH").ok().map(PathBuf::from),
            preserve_lab_tiers: env::var("PRESERVE_LAB_TIERS")
                .map(|raw| parse_flag("PRESERVE_LAB_TIERS", &raw))
                .unwrap_or(false),
            override_mode,
        }
    }

    pub fn bundle_paths(&self) -> BundlePaths {
        let defaults = BundlePaths::in_dir(&self.model_dir);
        BundlePaths {
            classifier: self.classifier_path.clone().unwrap_or(defaults.classifier),
            reducer: self.reducer_path.clone().unwrap_or(defaults.reducer),
            scaler: self.scaler_path.clone().unwrap_or(defaults.scaler),
            feature_names: self
                .feature_names_path
                .clone()
                .unwrap_or(defaults.feature_names),
            threshold: self.threshold_path.clone().unwrap_or(defaults.threshold),
        }
    }

    pub fn inference_settings(&self) -> InferenceSettings {
        InferenceSettings {
            lab_tier_encoding: if self.preserve_lab_tiers {
                LabTierEncoding::Preserved
            } else {
                LabTierEncoding::Collapsed
            },
            override_mode: self.override_mode,
        }
    }

    /// Log the current configuration
    pub fn log_config(&self) {
        let paths = self.bundle_paths();
        info!("🌐 Listening address: {}", self.bind_addr);
        info!("📦 Model directory: {}", self.model_dir.display());
        info!("   Classifier: {}", paths.classifier.display());
        info!("   Reducer: {}", paths.reducer.display());
        info!("   Scaler: {}", paths.scaler.display());
        info!("   Feature names: {}", paths.feature_names.display());
        info!("   Threshold (optional): {}", paths.threshold.display());
        if self.preserve_lab_tiers {
            warn!("🧪 Lab tier preservation ENABLED - the model must have been trained with tiered A1C/glucose codes");
        } else {
            info!("🧪 Lab tiers collapsed (>7 and >8, >200 and >300 share one code)");
        }
        match self.override_mode {
            OverrideMode::Parity => {
                info!("⚖️ Risk override: parity - elevated A1C/glucose forces a high-risk verdict")
            }
            OverrideMode::ModelOnly => info!("⚖️ Risk override: model_only - verdict follows the classifier"),
        }
    }
}

/// `true`/`false` only; anything else is logged and treated as `false`.
fn parse_flag(name: &str, raw: &str) -> bool {
    raw.trim().parse::<bool>().unwrap_or_else(|_| {
        warn!("{}='{}' is not 'true' or 'false'. Falling back to 'false'.", name, raw);
        false
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr, "127.0.0.1:8501");
        assert_eq!(config.model_dir, PathBuf::from("models"));
        assert!(!config.preserve_lab_tiers);
        assert_eq!(config.override_mode, OverrideMode::Parity);
        assert_eq!(config.inference_settings(), InferenceSettings::default());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("PRESERVE_LAB_TIERS", "true"));
        assert!(parse_flag("PRESERVE_LAB_TIERS", " true "));
        assert!(!parse_flag("PRESERVE_LAB_TIERS", "false"));
        assert!(!parse_flag("PRESERVE_LAB_TIERS", "1"));
        assert!(!parse_flag("PRESERVE_LAB_TIERS", "yes"));
    }

    #[test]
    fn test_env_config() {
        env::set_var("BIND_ADDR", "0.0.0.0:9000");
        env::set_var("MODEL_DIR", "/srv/models");
        env::set_var("THRESHOLD_PATH", "/etc/readmission/threshold.json");
        env::set_var("PRESERVE_LAB_TIERS", "true");
        env::set_var("RISK_OVERRIDE_MODE", "model_only");

        let config = AppConfig::from_env();
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert!(config.preserve_lab_tiers);
        assert_eq!(config.override_mode, OverrideMode::ModelOnly);

        let paths = config.bundle_paths();
        assert_eq!(paths.classifier, Path::new("/srv/models/classifier.json"));
        assert_eq!(paths.feature_names, Path::new("/srv/models/feature_names.json"));
        assert_eq!(paths.threshold, Path::new("/etc/readmission/threshold.json"));
        assert_eq!(
            config.inference_settings().lab_tier_encoding,
            LabTierEncoding::Preserved
        );

        // Clean up
        env::remove_var("BIND_ADDR");
        env::remove_var("MODEL_DIR");
        env::remove_var("THRESHOLD_PATH");
        env::remove_var("PRESERVE_LAB_TIERS");
        env::remove_var("RISK_OVERRIDE_MODE");
    }
}
