//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub symptoms: usize,
    pub conditions: usize,
}

/// `GET /api/health`: liveness plus loaded artifact sizes.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    let knowledge = ctx.session.knowledge();
    Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        symptoms: ctx.session.space().len(),
        conditions: knowledge.condition_count(),
    })
}
