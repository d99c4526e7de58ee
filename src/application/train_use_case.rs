// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the offline training batch job in order:
//
//   Step 1: Load the symptom CSV          (Layer 4 - data)
//   Step 2: Derive vocabulary + labels    (Layer 3 - domain)
//   Step 3: Encode rows into samples      (Layer 4 - data)
//   Step 4: Split train/validation        (Layer 4 - data)
//   Step 5: Build datasets                (Layer 4 - data)
//   Step 6: Save run config               (Layer 6 - infra)
//   Step 7: Run training loop + export    (Layer 5 - ml)
//
// Any failure before step 7 completes aborts the job with a
// non-zero outcome and leaves the artifact store untouched.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::SymptomDataset,
    encoder::encode_dataset,
    loader::CsvLoader,
    splitter::split_train_val,
};
use crate::domain::error::PipelineError;
use crate::domain::vocabulary::{DiseaseLabelSet, SymptomVocabulary};
use crate::infra::{artifact::ArtifactStore, metrics::MetricsLogger};
use crate::ml::trainer::run_training;

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run. Serialisable so the run that
// produced an artifact can be inspected later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_csv: String,
    pub artifact_dir: String,
    pub epochs: usize,
    pub batch_size: usize,
    pub lr: f64,
    /// Fraction of samples held out for validation, split once before
    /// training begins.
    pub val_fraction: f64,
    /// Epoch cadence of the console progress report.
    pub log_every: usize,
    /// Seed for the train/validation shuffle and the per-epoch batch
    /// shuffling, so a run is reproducible from its config.
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_csv: "data/Training.csv".to_string(),
            artifact_dir: "artifacts".to_string(),
            epochs: 300,
            batch_size: 8,
            lr: 1e-3,
            val_fraction: 0.2,
            log_every: 20,
            seed: 42,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
// Owns the config and runs the full training pipeline.
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end.
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Load and structurally validate the CSV ───────────────────
        tracing::info!("Loading training data from '{}'", cfg.data_csv);
        let raw = CsvLoader::new(&cfg.data_csv).load()?;

        // ── Step 2: Derive the frozen vocabulary and label set ───────────────
        // Order matters: these sequences define the positional index
        // mapping shared with inference, and are frozen into the artifact.
        let vocabulary = SymptomVocabulary::from_names(&raw.symptom_names);
        let labels = DiseaseLabelSet::from_labels(raw.rows.iter().map(|r| r.label.as_str()));
        tracing::info!(
            "Derived {} symptoms and {} distinct diseases",
            vocabulary.len(),
            labels.len(),
        );

        // ── Step 3: Encode rows into binary/one-hot samples ──────────────────
        let samples = encode_dataset(&raw, &labels)?;
        if samples.is_empty() {
            return Err(PipelineError::dataset("dataset contains no data rows").into());
        }
        tracing::info!("Encoded {} training samples", samples.len());

        // ── Step 4: Train / validation split, performed exactly once ─────────
        let (train_samples, val_samples) =
            split_train_val(samples, 1.0 - cfg.val_fraction, cfg.seed);
        tracing::info!(
            "Split: {} train, {} validation",
            train_samples.len(),
            val_samples.len(),
        );

        // ── Step 5: Build Burn datasets ──────────────────────────────────────
        let train_dataset = SymptomDataset::new(train_samples);
        let val_dataset = SymptomDataset::new(val_samples);

        // ── Step 6: Record the run configuration ─────────────────────────────
        let store = ArtifactStore::new(&cfg.artifact_dir);
        store.save_config(cfg)?;
        let metrics = MetricsLogger::new(&cfg.artifact_dir)?;

        // ── Step 7: Train and export the artifact (Layer 5) ──────────────────
        run_training(
            cfg,
            train_dataset,
            val_dataset,
            &vocabulary,
            &labels,
            &store,
            &metrics,
        )?;

        Ok(())
    }
}
