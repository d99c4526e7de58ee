// ============================================================
// Layer 5 — Prediction Engine
// ============================================================
// The serving-side state machine. Two states:
//
//   Unloaded — no model in memory yet
//   Loaded   — artifact read, model rebuilt, cached for the
//              process lifetime (no unload/reload surface)
//
// The Unloaded → Loaded transition happens on the first prediction
// call (or an explicit warm_up) and is guarded by a mutex: racing
// first-callers block while one of them reads and parses the
// artifact, then all observe the same cached model. After that the
// cached model is read-only and shared across arbitrarily many
// concurrent calls with no further locking.

use std::cmp::Ordering;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use burn::backend::ndarray::NdArrayDevice;
use burn::prelude::*;

use crate::domain::error::PipelineError;
use crate::domain::prediction::{DiseasePrediction, PredictionReport};
use crate::domain::traits::DiseasePredictor;
use crate::domain::vocabulary::{DiseaseLabelSet, SymptomVocabulary};
use crate::infra::artifact::ArtifactStore;
use crate::ml::model::DiseaseNet;

type InferBackend = burn::backend::NdArray;

/// How many ranked predictions a call returns.
pub const TOP_K: usize = 3;

struct LoadedModel {
    model: DiseaseNet<InferBackend>,
    vocabulary: SymptomVocabulary,
    labels: DiseaseLabelSet,
    device: NdArrayDevice,
}

/// Serves ranked disease predictions from the persisted artifact.
///
/// Construction is cheap and infallible; the artifact is read on
/// first use. The service is `Sync` — one instance is meant to be
/// shared by every request handler in the process.
pub struct PredictionService {
    store: ArtifactStore,
    loaded: OnceLock<LoadedModel>,
    load_guard: Mutex<()>,
}

impl PredictionService {
    pub fn new(artifact_dir: impl Into<PathBuf>) -> Self {
        Self {
            store: ArtifactStore::new(artifact_dir),
            loaded: OnceLock::new(),
            load_guard: Mutex::new(()),
        }
    }

    /// Force the Unloaded → Loaded transition now instead of on the
    /// first prediction call.
    pub fn warm_up(&self) -> Result<(), PipelineError> {
        self.ensure_loaded().map(|_| ())
    }

    /// Idempotent, concurrency-safe load. The fast path is a lock-free
    /// read of the cached model; the slow path serializes first-callers
    /// so the artifact is read and parsed exactly once.
    fn ensure_loaded(&self) -> Result<&LoadedModel, PipelineError> {
        if let Some(loaded) = self.loaded.get() {
            return Ok(loaded);
        }

        let _guard = self
            .load_guard
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Another first-caller may have finished while we waited
        if let Some(loaded) = self.loaded.get() {
            return Ok(loaded);
        }

        let artifact = self.store.load()?;
        let device = NdArrayDevice::default();
        let model = DiseaseNet::from_artifact(&artifact, &device)?;
        let vocabulary =
            SymptomVocabulary::from_names(&artifact.model_topology.symptom_vocabulary);
        let labels = DiseaseLabelSet::from_labels(&artifact.model_topology.disease_labels);

        tracing::info!(
            "Prediction model loaded: {} symptoms, {} diseases",
            vocabulary.len(),
            labels.len(),
        );

        Ok(self.loaded.get_or_init(|| LoadedModel {
            model,
            vocabulary,
            labels,
            device,
        }))
    }

    /// Predict from a set of selected symptom names.
    ///
    /// Pure with respect to (loaded artifact, input set): dropout is
    /// inactive on the inference backend, so the same request always
    /// yields the same ranked output. Symptoms outside the trained
    /// vocabulary are reported in the result, never an error.
    pub fn predict(&self, selected_symptoms: &[String]) -> Result<PredictionReport, PipelineError> {
        let loaded = self.ensure_loaded()?;

        let (features, ignored_symptoms) = loaded.vocabulary.vectorize(selected_symptoms);
        if !ignored_symptoms.is_empty() {
            tracing::warn!(
                "Ignoring {} symptom(s) outside the trained vocabulary: {}",
                ignored_symptoms.len(),
                ignored_symptoms.join(", "),
            );
        }

        let width = loaded.vocabulary.len();
        let input = Tensor::<InferBackend, 1>::from_floats(features.as_slice(), &loaded.device)
            .reshape([1, width]);

        let confidences: Vec<f32> = loaded
            .model
            .infer(input)
            .into_data()
            .to_vec()
            .map_err(|e| PipelineError::corrupt(format!("confidence readback failed: {e:?}")))?;

        let predictions = rank_predictions(&confidences, &loaded.labels, TOP_K);
        Ok(PredictionReport { predictions, ignored_symptoms })
    }
}

impl DiseasePredictor for PredictionService {
    fn predict_disease(
        &self,
        selected_symptoms: &[String],
    ) -> Result<Vec<DiseasePrediction>, PipelineError> {
        Ok(self.predict(selected_symptoms)?.predictions)
    }

    fn available_symptoms(&self) -> Result<Vec<String>, PipelineError> {
        Ok(self.ensure_loaded()?.vocabulary.as_slice().to_vec())
    }
}

/// Pair every label with its confidence, sort by (confidence desc,
/// label-set index asc), and keep the first `k`. The explicit index
/// tie-break keeps equal-confidence orderings deterministic.
fn rank_predictions(
    confidences: &[f32],
    labels: &DiseaseLabelSet,
    k: usize,
) -> Vec<DiseasePrediction> {
    let mut order: Vec<usize> = (0..confidences.len()).collect();
    order.sort_by(|&a, &b| {
        confidences[b]
            .partial_cmp(&confidences[a])
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.cmp(&b))
    });

    order
        .into_iter()
        .take(k)
        .map(|i| DiseasePrediction {
            disease: labels.name_of(i).to_string(),
            confidence: confidences[i],
        })
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::DiseaseNetConfig;
    use std::path::Path;

    fn vocab() -> SymptomVocabulary {
        SymptomVocabulary::from_names(&[
            "itching",
            "skin_rash",
            "nodal_skin_eruptions",
            "dischromic _patches",
        ])
    }

    fn labels() -> DiseaseLabelSet {
        DiseaseLabelSet::from_labels(["Fungal infection", "Allergy", "GERD"])
    }

    /// Persist an artifact whose weights are all zero: every input then
    /// produces identical logits, i.e. a uniform confidence tie.
    fn store_zeroed_artifact(dir: &Path) {
        let device = NdArrayDevice::default();
        let model = DiseaseNetConfig::new(4, 3).init::<InferBackend>(&device);
        let mut artifact = model.to_artifact(&vocab(), &labels()).unwrap();
        for tensor in &mut artifact.weights_data {
            tensor.data.iter_mut().for_each(|v| *v = 0.0);
        }
        ArtifactStore::new(dir).save(&artifact).unwrap();
    }

    fn symptoms(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn predict_without_artifact_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let service = PredictionService::new(dir.path());
        let err = service.predict(&symptoms(&["itching"])).unwrap_err();
        assert!(matches!(err, PipelineError::ArtifactNotFound { .. }));
    }

    #[test]
    fn returns_three_results_with_unit_total_mass() {
        let dir = tempfile::tempdir().unwrap();
        store_zeroed_artifact(dir.path());
        let service = PredictionService::new(dir.path());

        let report = service.predict(&symptoms(&["itching", "skin_rash"])).unwrap();
        assert_eq!(report.predictions.len(), 3);
        assert!(report.predictions.iter().all(|p| p.confidence >= 0.0));

        // With M = 3 the top-3 is the whole distribution
        let total: f32 = report.predictions.iter().map(|p| p.confidence).sum();
        assert!((total - 1.0).abs() < 1e-4, "sum was {total}");
    }

    #[test]
    fn equal_confidences_tie_break_in_label_set_order() {
        let dir = tempfile::tempdir().unwrap();
        store_zeroed_artifact(dir.path());
        let service = PredictionService::new(dir.path());

        let report = service.predict(&symptoms(&["itching"])).unwrap();
        let names: Vec<&str> = report.predictions.iter().map(|p| p.disease.as_str()).collect();
        assert_eq!(names, ["Fungal infection", "Allergy", "GERD"]);

        let confidences: Vec<f32> = report.predictions.iter().map(|p| p.confidence).collect();
        assert!((confidences[0] - confidences[1]).abs() < 1e-6);
        assert!((confidences[1] - confidences[2]).abs() < 1e-6);
    }

    #[test]
    fn unknown_symptom_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        store_zeroed_artifact(dir.path());
        let service = PredictionService::new(dir.path());

        let clean = service.predict(&symptoms(&["itching", "skin_rash"])).unwrap();
        let noisy = service
            .predict(&symptoms(&["itching", "skin_rash", "made_up_symptom"]))
            .unwrap();

        assert_eq!(noisy.ignored_symptoms, vec!["made_up_symptom".to_string()]);
        // Known vocabulary positions are unaffected by the unknown name
        assert_eq!(clean.predictions, noisy.predictions);
        assert!(clean.ignored_symptoms.is_empty());
    }

    #[test]
    fn prediction_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        store_zeroed_artifact(dir.path());
        let service = PredictionService::new(dir.path());

        let first = service.predict(&symptoms(&["itching"])).unwrap();
        let second = service.predict(&symptoms(&["itching"])).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn concurrent_first_callers_share_one_model() {
        let dir = tempfile::tempdir().unwrap();
        store_zeroed_artifact(dir.path());
        let service = PredictionService::new(dir.path());
        let input = symptoms(&["itching", "skin_rash"]);

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| service.predict(&input).unwrap()))
                .collect();
            let reports: Vec<PredictionReport> =
                handles.into_iter().map(|h| h.join().unwrap()).collect();
            for report in &reports[1..] {
                assert_eq!(report, &reports[0]);
            }
        });
    }

    #[test]
    fn warm_up_performs_the_load_eagerly() {
        let dir = tempfile::tempdir().unwrap();
        store_zeroed_artifact(dir.path());
        let service = PredictionService::new(dir.path());

        service.warm_up().unwrap();
        let report = service.predict(&symptoms(&["itching"])).unwrap();
        assert_eq!(report.predictions.len(), 3);
    }

    #[test]
    fn warm_up_without_artifact_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let service = PredictionService::new(dir.path());
        assert!(matches!(
            service.warm_up(),
            Err(PipelineError::ArtifactNotFound { .. })
        ));
    }

    #[test]
    fn available_symptoms_exposes_the_frozen_vocabulary() {
        let dir = tempfile::tempdir().unwrap();
        store_zeroed_artifact(dir.path());
        let service = PredictionService::new(dir.path());

        let names = service.available_symptoms().unwrap();
        assert_eq!(names, vocab().as_slice());
    }

    #[test]
    fn rank_orders_by_confidence_then_label_index() {
        let labels = labels();
        let ranked = rank_predictions(&[0.2, 0.5, 0.2], &labels, 3);
        let names: Vec<&str> = ranked.iter().map(|p| p.disease.as_str()).collect();
        // 0.5 first, then the 0.2 tie resolved by label-set order
        assert_eq!(names, ["Allergy", "Fungal infection", "GERD"]);
    }
}
