// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams between the serving layer and its collaborators.
// The resolver layer programs against these traits, never
// against concrete engine types.

use crate::domain::assessment::ConditionAssessment;
use crate::domain::error::PipelineError;
use crate::domain::prediction::DiseasePrediction;

// ─── DiseasePredictor ─────────────────────────────────────────────────────────
/// The call surface consumed by the external resolver layer.
///
/// Implementations:
///   - PredictionService → loads the trained artifact once, then serves
///     ranked predictions for the process lifetime
pub trait DiseasePredictor {
    /// Ranked top-3 predictions for a set of selected symptom names.
    /// Fails with `ArtifactNotFound` when no model has been trained.
    fn predict_disease(&self, selected_symptoms: &[String])
        -> Result<Vec<DiseasePrediction>, PipelineError>;

    /// The frozen symptom vocabulary, for client-side selection UIs.
    fn available_symptoms(&self) -> Result<Vec<String>, PipelineError>;
}

// ─── SymptomAnalyzer ──────────────────────────────────────────────────────────
/// An opaque, best-effort free-text analyzer (e.g. an LLM behind an
/// HTTP call). Implementations must degrade to the fixed fallback
/// assessments instead of propagating errors — a nurse-facing caller
/// always gets a usable answer.
pub trait SymptomAnalyzer {
    fn analyze(&self, symptoms_text: &str) -> Vec<ConditionAssessment>;
}
