// ============================================================
// Layer 6 — Model Artifact Store
// ============================================================
// One JSON document is the interchange format between the offline
// trainer and the online prediction engine (they may run as
// different processes):
//
//   {
//     "modelTopology": { ...layer stack + frozen vocabulary... },
//     "weightsData": [
//       { "name": "dense_0/kernel", "shape": [132, 64], "data": [...] },
//       { "name": "dense_0/bias",   "shape": [64],      "data": [...] },
//       ...
//     ]
//   }
//
// `data` is the flattened tensor payload in row-major order
// consistent with `shape`. The artifact is immutable once written;
// retraining produces a whole new document. The write is a
// temp-file-then-rename so a concurrent reader never observes a
// partially written model.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, io::ErrorKind, path::PathBuf};

use crate::application::train_use_case::TrainConfig;
use crate::domain::error::PipelineError;

pub const ARTIFACT_FILE: &str = "model.json";
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

// ─── Artifact document ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Softmax,
}

/// Declarative description of one layer in the stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LayerSpec {
    Dense { units: usize, activation: Activation },
    Dropout { rate: f64 },
}

/// The topology descriptor embedded in the artifact. Besides the layer
/// stack it freezes the vocabulary and label ordering the weights were
/// trained against — indices are positional at the tensor boundary, so
/// inference must reuse exactly these sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelTopology {
    pub format_version: u32,
    pub input_dim: usize,
    pub output_dim: usize,
    pub layers: Vec<LayerSpec>,
    pub symptom_vocabulary: Vec<String>,
    pub disease_labels: Vec<String>,
}

/// One named weight tensor with its shape and flat row-major payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTensor {
    pub name: String,
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

/// The persisted (topology + weights) pair for one trained model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelArtifact {
    pub model_topology: ModelTopology,
    pub weights_data: Vec<WeightTensor>,
}

impl ModelArtifact {
    /// Check the artifact's internal consistency: every weight tensor
    /// must match the dimensions the topology declares, in order.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let topo = &self.model_topology;

        if topo.symptom_vocabulary.len() != topo.input_dim {
            return Err(PipelineError::corrupt(format!(
                "vocabulary length {} != declared input width {}",
                topo.symptom_vocabulary.len(),
                topo.input_dim,
            )));
        }
        if topo.disease_labels.len() != topo.output_dim {
            return Err(PipelineError::corrupt(format!(
                "label set length {} != declared output width {}",
                topo.disease_labels.len(),
                topo.output_dim,
            )));
        }

        // Walk the declared dense layers and chain their widths
        let dense_dims = topo.dense_dims();
        match dense_dims.last() {
            Some(&(_, out)) if out == topo.output_dim => {}
            Some(&(_, out)) => {
                return Err(PipelineError::corrupt(format!(
                    "last dense layer width {} != declared output width {}",
                    out, topo.output_dim,
                )));
            }
            None => return Err(PipelineError::corrupt("topology declares no dense layers")),
        }

        // Two tensors (kernel + bias) per dense layer, in layer order
        if self.weights_data.len() != dense_dims.len() * 2 {
            return Err(PipelineError::corrupt(format!(
                "expected {} weight tensors for {} dense layers, found {}",
                dense_dims.len() * 2,
                dense_dims.len(),
                self.weights_data.len(),
            )));
        }

        for (i, &(fan_in, fan_out)) in dense_dims.iter().enumerate() {
            let kernel = &self.weights_data[i * 2];
            let bias = &self.weights_data[i * 2 + 1];
            check_tensor(kernel, &[fan_in, fan_out])?;
            check_tensor(bias, &[fan_out])?;
        }

        Ok(())
    }
}

impl ModelTopology {
    /// (fan_in, fan_out) per dense layer, chained from the input width.
    pub fn dense_dims(&self) -> Vec<(usize, usize)> {
        let mut dims = Vec::new();
        let mut width = self.input_dim;
        for layer in &self.layers {
            if let LayerSpec::Dense { units, .. } = layer {
                dims.push((width, *units));
                width = *units;
            }
        }
        dims
    }
}

fn check_tensor(tensor: &WeightTensor, expected_shape: &[usize]) -> Result<(), PipelineError> {
    if tensor.shape != expected_shape {
        return Err(PipelineError::corrupt(format!(
            "tensor '{}': shape {:?} != expected {:?}",
            tensor.name, tensor.shape, expected_shape,
        )));
    }
    let expected_len: usize = expected_shape.iter().product();
    if tensor.data.len() != expected_len {
        return Err(PipelineError::corrupt(format!(
            "tensor '{}': payload length {} != shape product {}",
            tensor.name,
            tensor.data.len(),
            expected_len,
        )));
    }
    Ok(())
}

// ─── ArtifactStore ────────────────────────────────────────────────────────────

/// File-based store holding at most one artifact per directory.
/// Each save fully replaces prior content; there is no versioning.
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.dir.join(ARTIFACT_FILE)
    }

    /// Persist one artifact, replacing any prior one atomically.
    ///
    /// The document is serialized into a temp file in the same
    /// directory, then renamed over the target — a concurrent reader
    /// sees either the old artifact or the new one, never a torn file.
    pub fn save(&self, artifact: &ModelArtifact) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create artifact dir '{}'", self.dir.display()))?;

        let path = self.artifact_path();
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("Cannot create temp file in '{}'", self.dir.display()))?;
        serde_json::to_writer_pretty(&mut tmp, artifact)
            .context("Failed to serialize model artifact")?;
        tmp.persist(&path)
            .with_context(|| format!("Failed to replace artifact '{}'", path.display()))?;

        tracing::info!("Saved model artifact to '{}'", path.display());
        Ok(())
    }

    /// Record the configuration of the training run that produced the
    /// artifact, for later inspection of a serving deployment.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create artifact dir '{}'", self.dir.display()))?;
        let path = self.dir.join("train_config.json");
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// Read the artifact back, validating it before returning.
    ///
    /// A missing file is `ArtifactNotFound` (the model was never
    /// trained); anything unparseable or shape-inconsistent is
    /// `ArtifactCorrupt`.
    pub fn load(&self) -> Result<ModelArtifact, PipelineError> {
        let path = self.artifact_path();
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PipelineError::ArtifactNotFound { path });
            }
            Err(e) => {
                return Err(PipelineError::corrupt(format!(
                    "cannot read '{}': {e}",
                    path.display(),
                )));
            }
        };

        let artifact: ModelArtifact = serde_json::from_str(&json).map_err(|e| {
            PipelineError::corrupt(format!("cannot parse '{}': {e}", path.display()))
        })?;

        artifact.validate()?;
        Ok(artifact)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal valid artifact: one dense layer, 2 symptoms → 2 diseases.
    fn tiny_artifact() -> ModelArtifact {
        ModelArtifact {
            model_topology: ModelTopology {
                format_version: ARTIFACT_FORMAT_VERSION,
                input_dim: 2,
                output_dim: 2,
                layers: vec![LayerSpec::Dense {
                    units: 2,
                    activation: Activation::Softmax,
                }],
                symptom_vocabulary: vec!["itching".into(), "skin_rash".into()],
                disease_labels: vec!["Fungal infection".into(), "Allergy".into()],
            },
            weights_data: vec![
                WeightTensor {
                    name: "dense_0/kernel".into(),
                    shape: vec![2, 2],
                    data: vec![1.0, 0.0, 0.0, 1.0],
                },
                WeightTensor {
                    name: "dense_0/bias".into(),
                    shape: vec![2],
                    data: vec![0.0, 0.0],
                },
            ],
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let artifact = tiny_artifact();

        store.save(&artifact).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, artifact);
    }

    #[test]
    fn save_replaces_prior_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        store.save(&tiny_artifact()).unwrap();
        let mut second = tiny_artifact();
        second.weights_data[1].data = vec![0.5, -0.5];
        store.save(&second).unwrap();

        assert_eq!(store.load().unwrap(), second);
    }

    #[test]
    fn missing_artifact_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        assert!(matches!(
            store.load(),
            Err(PipelineError::ArtifactNotFound { .. })
        ));
    }

    #[test]
    fn garbage_json_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        fs::write(store.artifact_path(), "{not json").unwrap();
        assert!(matches!(
            store.load(),
            Err(PipelineError::ArtifactCorrupt { .. })
        ));
    }

    #[test]
    fn shape_mismatch_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        let mut bad = tiny_artifact();
        bad.weights_data[0].shape = vec![3, 2];
        bad.weights_data[0].data = vec![0.0; 6];
        let json = serde_json::to_string(&bad).unwrap();
        fs::write(store.artifact_path(), json).unwrap();

        match store.load() {
            Err(PipelineError::ArtifactCorrupt { detail }) => {
                assert!(detail.contains("dense_0/kernel"), "detail: {detail}");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn truncated_payload_is_corrupt() {
        let mut bad = tiny_artifact();
        bad.weights_data[0].data.pop();
        assert!(matches!(
            bad.validate(),
            Err(PipelineError::ArtifactCorrupt { .. })
        ));
    }

    #[test]
    fn vocabulary_width_mismatch_is_corrupt() {
        let mut bad = tiny_artifact();
        bad.model_topology.symptom_vocabulary.push("extra".into());
        assert!(matches!(
            bad.validate(),
            Err(PipelineError::ArtifactCorrupt { .. })
        ));
    }

    #[test]
    fn artifact_json_uses_interchange_keys() {
        let json = serde_json::to_string(&tiny_artifact()).unwrap();
        assert!(json.contains("\"modelTopology\""));
        assert!(json.contains("\"weightsData\""));
        assert!(json.contains("\"shape\":[2,2]"));
    }
}
