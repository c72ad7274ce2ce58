//! Prediction endpoint.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::application::SymptomChecker;
use crate::domain::Prediction;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Missing field means no symptoms
    #[serde(default)]
    pub symptoms: Vec<String>,
}

/// `POST /predict`: symptom names in, disease and care details out.
pub async fn predict(
    State(checker): State<Arc<SymptomChecker>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<Prediction>, ApiError> {
    let Json(request) = payload?;
    tracing::debug!("POST /predict with {} symptom(s)", request.symptoms.len());

    let prediction = checker.predict(&request.symptoms)?;
    Ok(Json(prediction))
}
