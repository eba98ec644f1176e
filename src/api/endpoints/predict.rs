//! Ranking endpoints.
//!
//! - `POST /api/predict`: rank conditions for a symptom id list
//! - `POST /api/refine`: add comma-separated extras and rank again

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{
    ApiContext, PredictRequest, PredictResponse, PredictionItem, RefineRequest, RefineResponse,
};
use crate::config::defaults;

pub async fn predict(
    State(ctx): State<ApiContext>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(req) = payload?;
    if req.symptoms.is_empty() {
        return Err(ApiError::BadRequest("At least one symptom is required".into()));
    }

    let top_n = req.top_n.unwrap_or(defaults::TOP_N);
    let predictions = ctx
        .session
        .predict(&req.symptoms, top_n)
        .into_iter()
        .map(PredictionItem::from)
        .collect();

    Ok(Json(PredictResponse { predictions }))
}

/// Unknown extras are dropped; with none left the ranking of the given
/// symptoms is returned unchanged.
pub async fn refine(
    State(ctx): State<ApiContext>,
    payload: Result<Json<RefineRequest>, JsonRejection>,
) -> Result<Json<RefineResponse>, ApiError> {
    let Json(req) = payload?;
    if req.symptoms.is_empty() && req.extra.trim().is_empty() {
        return Err(ApiError::BadRequest("Symptoms or extra symptoms are required".into()));
    }

    let top_n = req.top_n.unwrap_or(defaults::TOP_N_REFINED);
    let session = &ctx.session;

    let response = match session.refine(&req.symptoms, &req.extra, top_n) {
        Some(refined) => RefineResponse {
            added: refined.added,
            symptoms: refined.symptom_ids,
            predictions: refined.predictions.into_iter().map(PredictionItem::from).collect(),
        },
        None => {
            let presence = session.space().presence(&req.symptoms);
            RefineResponse {
                added: Vec::new(),
                symptoms: presence
                    .active_ids(session.space())
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                predictions: session
                    .predict(&req.symptoms, top_n)
                    .into_iter()
                    .map(PredictionItem::from)
                    .collect(),
            }
        }
    };

    Ok(Json(response))
}
