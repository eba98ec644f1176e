use serde::{Deserialize, Serialize};

/// A symptom found in user text. At most one per symptom id per extraction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetectionResult {
    pub symptom_id: String,
    /// Canonical display name from the knowledge base.
    pub name: String,
    /// Token-set similarity, 0-100. Always at or above the matcher threshold.
    pub confidence: u8,
}
