use axum::extract::State;
use axum::Json;

use crate::api::types::ApiContext;
use crate::session::KnownSymptom;

/// `GET /api/symptoms`: every known symptom, for autocomplete.
pub async fn list(State(ctx): State<ApiContext>) -> Json<Vec<KnownSymptom>> {
    Json(ctx.session.all_symptoms())
}
