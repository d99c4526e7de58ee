// ============================================================
// Layer 3 — Prediction Results
// ============================================================

use serde::{Deserialize, Serialize};

/// One disease hypothesis with its softmax confidence.
/// Confidence is in [0, 1]; a full inference distributes total mass 1.0
/// over every disease in the label set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseasePrediction {
    pub disease: String,
    pub confidence: f32,
}

/// The structured outcome of one prediction call.
///
/// `predictions` holds the top-3 diseases, sorted by confidence
/// descending with ties broken by label-set order. `ignored_symptoms`
/// lists every requested symptom that was not in the trained
/// vocabulary — a diagnostic, not an error, so client drift (e.g. a
/// misspelled symptom) is visible instead of silently contributing
/// nothing to the input vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionReport {
    pub predictions: Vec<DiseasePrediction>,
    pub ignored_symptoms: Vec<String>,
}
