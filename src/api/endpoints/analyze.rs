//! `POST /api/analyze`: free text to detected symptoms.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{AnalyzeRequest, AnalyzeResponse, ApiContext, DetectedSymptom};

pub async fn analyze(
    State(ctx): State<ApiContext>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(req) = payload?;
    if req.text.trim().is_empty() {
        return Err(ApiError::BadRequest("Text is required".into()));
    }

    let detected = ctx.session.extract(&req.text);
    let detected_ids = detected.iter().map(|d| d.symptom_id.clone()).collect();

    Ok(Json(AnalyzeResponse {
        symptoms: detected.into_iter().map(DetectedSymptom::from).collect(),
        detected_ids,
    }))
}
