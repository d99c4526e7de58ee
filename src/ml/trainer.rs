// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full train + validation loop using Burn's DataLoader and Adam.
//
// Training runs on Autodiff<NdArray> for gradients; validation and
// the exported artifact use model.valid() on the inner NdArray
// backend, where dropout is the identity.
//
// The epoch-cadence report is an observability hook only: training
// never branches on loss or accuracy — no early stopping, no
// learning-rate schedule. Poor convergence is reported, not an
// error.

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::SymptomBatcher, dataset::SymptomDataset};
use crate::domain::error::PipelineError;
use crate::domain::vocabulary::{DiseaseLabelSet, SymptomVocabulary};
use crate::infra::artifact::ArtifactStore;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::{DiseaseNet, DiseaseNetConfig};

type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;
type InnerBackend = burn::backend::NdArray;

/// Train the classifier and persist the resulting artifact.
/// Nothing is written to the store until training has completed.
pub fn run_training(
    cfg: &TrainConfig,
    train_dataset: SymptomDataset,
    val_dataset: SymptomDataset,
    vocabulary: &SymptomVocabulary,
    labels: &DiseaseLabelSet,
    store: &ArtifactStore,
    metrics: &MetricsLogger,
) -> Result<()> {
    if train_dataset.sample_count() == 0 {
        return Err(PipelineError::dataset("no training samples to fit").into());
    }

    let device = burn::backend::ndarray::NdArrayDevice::default();

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = DiseaseNetConfig::new(vocabulary.len(), labels.len());
    let mut model: DiseaseNet<TrainBackend> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: {} symptoms in, {} diseases out",
        vocabulary.len(),
        labels.len(),
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let optim_cfg = AdamConfig::new().with_epsilon(1e-8);
    let mut optim = optim_cfg.init();

    // ── Training data loader (samples reshuffled every epoch) ─────────────────
    let train_batcher = SymptomBatcher::<TrainBackend>::new(device.clone());
    let train_loader = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    // ── Validation data loader (InnerBackend — no autodiff overhead) ──────────
    let val_batcher = SymptomBatcher::<InnerBackend>::new(device.clone());
    let val_loader = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(val_dataset);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_batches = 0usize;
        let mut train_correct = 0usize;
        let mut train_samples = 0usize;

        for batch in train_loader.iter() {
            let (loss, logits) = model.forward_loss(batch.features, batch.targets.clone());

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            train_loss_sum += loss_val;
            train_batches += 1;

            // argmax(1) returns shape [batch, 1] — squeeze to [batch]
            // before comparing with the targets which are [batch]
            let predicted = logits.argmax(1).flatten::<1>(0, 1);
            let correct: i64 = predicted
                .equal(batch.targets.clone())
                .int()
                .sum()
                .into_scalar()
                .elem::<i64>();
            train_correct += correct as usize;
            train_samples += batch.targets.dims()[0];

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let avg_train_loss = if train_batches > 0 {
            train_loss_sum / train_batches as f64
        } else {
            f64::NAN
        };
        let train_acc = if train_samples > 0 {
            train_correct as f64 / train_samples as f64
        } else {
            0.0
        };

        // ── Validation phase ──────────────────────────────────────────────────
        // model.valid() → DiseaseNet<InnerBackend>, dropout bypassed
        let model_valid = model.valid();

        let mut val_loss_sum = 0.0f64;
        let mut val_batches = 0usize;
        let mut val_correct = 0usize;
        let mut val_samples = 0usize;

        for batch in val_loader.iter() {
            let logits = model_valid.forward(batch.features);

            let ce = burn::nn::loss::CrossEntropyLossConfig::new().init(&logits.device());
            let batch_loss: f64 = ce
                .forward(logits.clone(), batch.targets.clone())
                .into_scalar()
                .elem::<f64>();
            val_loss_sum += batch_loss;
            val_batches += 1;

            let predicted = logits.argmax(1).flatten::<1>(0, 1);
            let correct: i64 = predicted
                .equal(batch.targets.clone())
                .int()
                .sum()
                .into_scalar()
                .elem::<i64>();
            val_correct += correct as usize;
            val_samples += batch.targets.dims()[0];
        }

        let avg_val_loss = if val_batches > 0 {
            val_loss_sum / val_batches as f64
        } else {
            f64::NAN
        };
        let val_acc = if val_samples > 0 {
            val_correct as f64 / val_samples as f64
        } else {
            0.0
        };

        metrics.log(&EpochMetrics::new(
            epoch,
            avg_train_loss,
            train_acc,
            avg_val_loss,
            val_acc,
        ))?;

        if epoch % cfg.log_every.max(1) == 0 || epoch == cfg.epochs {
            println!(
                "Epoch {:>3}/{} | loss={:.4} | acc={:.2}% | val_loss={:.4} | val_acc={:.2}%",
                epoch,
                cfg.epochs,
                avg_train_loss,
                train_acc * 100.0,
                avg_val_loss,
                val_acc * 100.0,
            );
        }
    }

    // ── Export the trained artifact ───────────────────────────────────────────
    // Weights are read from the inner-backend model; the vocabulary and
    // label ordering are frozen into the topology alongside them.
    let artifact = model.valid().to_artifact(vocabulary, labels)?;
    store.save(&artifact)?;

    tracing::info!("Training complete, artifact written");
    Ok(())
}
