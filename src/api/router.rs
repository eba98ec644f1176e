//! API router.
//!
//! Returns a composable `Router` with all routes nested under `/api/`.
//! CORS is permissive so a browser front-end on another origin can call it.
//! Unmatched paths get the same JSON error envelope as handler errors.

use std::sync::Arc;

use axum::extract::OriginalUri;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::session::TriageSession;

/// Build the API router over a loaded session.
pub fn api_router(session: Arc<TriageSession>) -> Router {
    let ctx = ApiContext::new(session);

    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/analyze", post(endpoints::analyze::analyze))
        .route("/predict", post(endpoints::predict::predict))
        .route("/refine", post(endpoints::predict::refine))
        .route("/symptoms", get(endpoints::symptoms::list))
        .with_state(ctx);

    Router::new()
        .nest("/api", routes)
        .fallback(route_not_found)
        .layer(CorsLayer::permissive())
}

async fn route_not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
