// ============================================================
// Layer 3 — Pipeline Error Taxonomy
// ============================================================
// Four failure classes cover the whole pipeline boundary:
//
//   DatasetFormat   — malformed/mismatched training data.
//                     Fatal to the training run; raised before
//                     any artifact is written.
//   UnknownLabel    — a row's disease label is missing from the
//                     derived label set. Only reachable when an
//                     externally supplied label set is used.
//   ArtifactNotFound — inference requested but no trained model
//                     exists at the expected location.
//   ArtifactCorrupt — the persisted artifact fails shape or
//                     topology consistency checks on load.
//
// Unknown symptoms in a prediction request are deliberately NOT
// in this taxonomy: they are tolerated, logged, and reported in
// the structured PredictionReport instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Malformed or mismatched training data. The detail names the
    /// offending line/column so the dataset can be fixed.
    #[error("invalid dataset: {detail}")]
    DatasetFormat { detail: String },

    /// A row's label is absent from the disease label set in use.
    #[error("unknown disease label '{label}' at data line {line}")]
    UnknownLabel { label: String, line: usize },

    /// No trained artifact exists at the expected location.
    #[error(
        "no trained model found at '{}' — train the model first \
         (run the `train` command)",
        path.display()
    )]
    ArtifactNotFound { path: PathBuf },

    /// The artifact exists but is internally inconsistent.
    #[error("model artifact is corrupt: {detail}")]
    ArtifactCorrupt { detail: String },
}

impl PipelineError {
    /// Shorthand for a `DatasetFormat` error with a formatted detail.
    pub fn dataset(detail: impl Into<String>) -> Self {
        Self::DatasetFormat { detail: detail.into() }
    }

    /// Shorthand for an `ArtifactCorrupt` error with a formatted detail.
    pub fn corrupt(detail: impl Into<String>) -> Self {
        Self::ArtifactCorrupt { detail: detail.into() }
    }
}
