// ============================================================
// Layer 2 — Predict Use Case
// ============================================================
// Thin orchestration over the prediction engine: owns one
// PredictionService for the process and adapts its typed errors
// to the application boundary.

use anyhow::Result;
use std::path::PathBuf;

use crate::domain::prediction::PredictionReport;
use crate::domain::traits::DiseasePredictor;
use crate::ml::engine::PredictionService;

pub struct PredictUseCase {
    service: PredictionService,
}

impl PredictUseCase {
    /// Construction is cheap; the artifact is loaded on first use.
    pub fn new(artifact_dir: impl Into<PathBuf>) -> Self {
        Self {
            service: PredictionService::new(artifact_dir),
        }
    }

    /// Ranked top-3 predictions plus the structured ignored-symptom
    /// diagnostic.
    pub fn predict(&self, selected_symptoms: &[String]) -> Result<PredictionReport> {
        Ok(self.service.predict(selected_symptoms)?)
    }

    /// The frozen vocabulary the model was trained against.
    pub fn available_symptoms(&self) -> Result<Vec<String>> {
        Ok(self.service.available_symptoms()?)
    }
}
