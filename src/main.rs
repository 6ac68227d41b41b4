// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;

use readmission_lib::bundle::ModelBundle;
use readmission_lib::inference::{InferenceEngine, OverrideMode};
use readmission_lib::utils::app_config::AppConfig;
use readmission_lib::utils::env::load_env;
use readmission_lib::web::{self, AppState};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct ServerArgs {
    /// Address to listen on (overrides BIND_ADDR)
    #[arg(long)]
    bind: Option<String>,

    /// Directory holding the model artifacts (overrides MODEL_DIR)
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Encode >8 / >300 lab results with their own code
    #[arg(long)]
    preserve_lab_tiers: bool,

    /// parity or model_only (overrides RISK_OVERRIDE_MODE)
    #[arg(long)]
    override_mode: Option<OverrideMode>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Starting readmission risk server...");

    load_env();
    let args = ServerArgs::parse();

    let mut config = AppConfig::from_env();
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(model_dir) = args.model_dir {
        config.model_dir = model_dir;
    }
    if args.preserve_lab_tiers {
        config.preserve_lab_tiers = true;
    }
    if let Some(mode) = args.override_mode {
        config.override_mode = mode;
    }
    config.log_config();

    let state = match ModelBundle::load(&config.bundle_paths()) {
        Ok(bundle) => {
            info!("✅ Model bundle loaded (fingerprint {})", bundle.fingerprint);
            AppState::ready(InferenceEngine::new(
                Arc::new(bundle),
                config.inference_settings(),
            ))
        }
        Err(e) => {
            error!("❌ Model bundle unavailable: {}", e);
            warn!("Serving the configuration error page until the artifacts are fixed and the server restarted");
            AppState::unavailable(e)
        }
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("🚀 Listening on http://{}", config.bind_addr);

    axum::serve(listener, web::router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received");
        })
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}
