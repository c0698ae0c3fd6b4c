//! HTTP request handlers

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::inference::ModelInferenceService;
use crate::schema::ApartmentFeatures;

use super::error::{Result, ServerError};
use super::state::AppState;

// ============================================================================
// Prediction Handlers
// ============================================================================

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub prediction: f64,
}

/// Validate raw input, build the feature vector and run the model.
///
/// Validation failures return before the model is touched.
pub fn run_pipeline(
    inference: &ModelInferenceService,
    raw: &Map<String, Value>,
) -> Result<PredictionResponse> {
    let features = ApartmentFeatures::validate(raw)?;
    let vector = features.to_feature_vector();
    let prediction = inference.predict(&vector)?;

    info!(prediction, "Prediction served");
    Ok(PredictionResponse { prediction })
}

/// `GET /pred/?area=..&constructionYear=..`
pub async fn predict_from_query(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<Json<PredictionResponse>> {
    let Query(params) = query.map_err(|e| ServerError::Parse(e.body_text()))?;
    debug!(n_params = params.len(), "Received query prediction request");

    let raw: Map<String, Value> = params
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();

    run_pipeline(&state.inference, &raw).map(Json)
}

/// `POST /pred/` with a JSON object body
pub async fn predict_from_body(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictionResponse>> {
    let Json(body) = body.map_err(|e| ServerError::Parse(e.body_text()))?;
    debug!("Received JSON prediction request");

    let Value::Object(raw) = body else {
        return Err(ServerError::Parse(
            "Expected a JSON object with apartment features".to_string(),
        ));
    };

    run_pipeline(&state.inference, &raw).map(Json)
}

// ============================================================================
// System Handlers
// ============================================================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "address": state.config.bind_address(),
        "model_loaded": state.inference.is_loaded(),
        "model": state.inference.model_info(),
        "uptime_secs": state.uptime_secs(),
    }))
}
