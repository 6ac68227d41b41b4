// src/web/mod.rs
//! HTTP surface: the HTML form, its JSON twin and a health probe.

pub mod form;
pub mod render;

use axum::extract::rejection::{JsonRejection, RawFormRejection};
use axum::extract::{RawForm, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, warn};
use serde_json::json;
use std::sync::Arc;

use crate::error::ConfigurationError;
use crate::inference::InferenceEngine;
use crate::models::RawInput;

/// Outcome of the startup bundle load. The server stays up either way.
#[derive(Debug)]
pub enum BundleStatus {
    Ready(InferenceEngine),
    Unavailable(ConfigurationError),
}

#[derive(Debug, Clone)]
pub struct AppState {
    status: Arc<BundleStatus>,
}

impl AppState {
    pub fn ready(engine: InferenceEngine) -> Self {
        Self {
            status: Arc::new(BundleStatus::Ready(engine)),
        }
    }

    pub fn unavailable(err: ConfigurationError) -> Self {
        Self {
            status: Arc::new(BundleStatus::Unavailable(err)),
        }
    }

    pub fn status(&self) -> &BundleStatus {
        &self.status
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict_page))
        .route("/api/predict", post(predict_api))
        .route("/health", get(health))
        .with_state(state)
}

async fn index(State(state): State<AppState>) -> Response {
    match state.status() {
        BundleStatus::Ready(_) => Html(render::form_page(&RawInput::default(), &[])).into_response(),
        BundleStatus::Unavailable(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Html(render::configuration_error_page(err)),
        )
            .into_response(),
    }
}

async fn predict_page(
    State(state): State<AppState>,
    submitted: Result<RawForm, RawFormRejection>,
) -> Response {
    let engine = match state.status() {
        BundleStatus::Ready(engine) => engine,
        BundleStatus::Unavailable(err) => {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Html(render::configuration_error_page(err)),
            )
                .into_response()
        }
    };

    let (input, mut problems) = match submitted {
        Ok(RawForm(body)) => form::decode_form(&body),
        Err(rejection) => (RawInput::default(), vec![rejection.body_text()]),
    };
    if let Err(out_of_range) = input.validate() {
        problems.extend(out_of_range);
    }
    if !problems.is_empty() {
        warn!("Rejected form submission: {:?}", problems);
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(render::form_page(&input, &problems)),
        )
            .into_response();
    }

    match engine.predict(&input) {
        Ok(result) => Html(render::result_page(&input, &result)).into_response(),
        Err(e) => {
            error!("{}", e.diagnostic());
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render::inference_error_page(&input, &e)),
            )
                .into_response()
        }
    }
}

fn json_error(status: StatusCode, message: impl Into<serde_json::Value>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

async fn predict_api(
    State(state): State<AppState>,
    payload: Result<Json<RawInput>, JsonRejection>,
) -> Response {
    let engine = match state.status() {
        BundleStatus::Ready(engine) => engine,
        BundleStatus::Unavailable(err) => {
            return json_error(StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        }
    };

    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => {
            warn!("Rejected JSON payload: {}", rejection.body_text());
            return json_error(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text());
        }
    };

    if let Err(problems) = input.validate() {
        return json_error(StatusCode::UNPROCESSABLE_ENTITY, problems);
    }

    match engine.predict(&input) {
        Ok(result) => Json(result).into_response(),
        Err(e) => {
            error!("{}", e.diagnostic());
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": e.to_string(),
                    "stage": e.stage.to_string(),
                })),
            )
                .into_response()
        }
    }
}

async fn health(State(state): State<AppState>) -> Response {
    match state.status() {
        BundleStatus::Ready(engine) => {
            let bundle = engine.bundle();
            Json(json!({
                "status": "ok",
                "fingerprint": bundle.fingerprint,
                "features": bundle.schema.len(),
                "classifier": bundle.classifier.kind(),
                "threshold": bundle.threshold.value,
                "override_mode": engine.settings().override_mode,
            }))
            .into_response()
        }
        BundleStatus::Unavailable(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable", "error": err.to_string() })),
        )
            .into_response(),
    }
}
