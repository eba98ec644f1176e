//! Shared state and wire types for the HTTP API.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::inference::RankedPrediction;
use crate::nlp::DetectionResult;
use crate::session::TriageSession;

// ═══════════════════════════════════════════════════════════
// API context
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub session: Arc<TriageSession>,
}

impl ApiContext {
    pub fn new(session: Arc<TriageSession>) -> Self {
        Self { session }
    }
}

// ═══════════════════════════════════════════════════════════
// Requests
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub symptoms: Vec<String>,
    pub top_n: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RefineRequest {
    #[serde(default)]
    pub symptoms: Vec<String>,
    /// Comma-separated extra symptoms as typed by the user.
    #[serde(default)]
    pub extra: String,
    pub top_n: Option<usize>,
}

// ═══════════════════════════════════════════════════════════
// Responses
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
pub struct DetectedSymptom {
    pub id: String,
    pub name: String,
    pub confidence: u8,
}

impl From<DetectionResult> for DetectedSymptom {
    fn from(d: DetectionResult) -> Self {
        Self {
            id: d.symptom_id,
            name: d.name,
            confidence: d.confidence,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub symptoms: Vec<DetectedSymptom>,
    pub detected_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PredictionItem {
    pub disease: String,
    /// Percentage, two decimals.
    pub confidence: f64,
    pub common_symptoms: Vec<String>,
}

impl From<RankedPrediction> for PredictionItem {
    fn from(p: RankedPrediction) -> Self {
        Self {
            disease: p.condition,
            confidence: p.confidence_percent,
            common_symptoms: p.common_symptoms,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predictions: Vec<PredictionItem>,
}

#[derive(Debug, Serialize)]
pub struct RefineResponse {
    /// Extra symptom ids that were newly added.
    pub added: Vec<String>,
    /// Effective symptom set used for ranking.
    pub symptoms: Vec<String>,
    pub predictions: Vec<PredictionItem>,
}
