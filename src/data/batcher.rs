// ============================================================
// Layer 4 — Symptom Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<SymptomSample>
// into tensors for one forward pass.
//
//   Input:  Vec of N samples, each with a feature vector of width W
//   Output: SymptomBatch with features [N, W] and targets [N]
//
// All feature vectors share the same width (the encoder guarantees
// it), so batching is a flatten-then-reshape with no padding step.

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::dataset::SymptomSample;

// ─── SymptomBatch ─────────────────────────────────────────────────────────────
/// A batch of encoded samples ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct SymptomBatch<B: Backend> {
    /// Binary symptom vectors — shape: [batch_size, num_symptoms]
    pub features: Tensor<B, 2>,

    /// True disease indices — shape: [batch_size]
    /// Integer class targets for the cross-entropy loss; each is the
    /// hot position of the sample's one-hot output vector.
    pub targets: Tensor<B, 1, Int>,
}

// ─── SymptomBatcher ───────────────────────────────────────────────────────────
/// Holds the target device so tensors are created in the right place.
#[derive(Clone, Debug)]
pub struct SymptomBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> SymptomBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<SymptomSample, SymptomBatch<B>> for SymptomBatcher<B> {
    fn batch(&self, items: Vec<SymptomSample>) -> SymptomBatch<B> {
        let batch_size = items.len();
        let width = items[0].features.len();

        let features_flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.features.iter().copied())
            .collect();

        let targets: Vec<i32> = items.iter().map(|s| s.label_index() as i32).collect();

        let features = Tensor::<B, 1>::from_floats(features_flat.as_slice(), &self.device)
            .reshape([batch_size, width]);

        let targets = Tensor::<B, 1, Int>::from_ints(targets.as_slice(), &self.device);

        SymptomBatch { features, targets }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::ndarray::NdArrayDevice;
    use burn::backend::NdArray;

    #[test]
    fn batch_shapes_match_sample_count_and_width() {
        let samples = vec![
            SymptomSample {
                features: vec![1.0, 0.0, 1.0],
                one_hot: vec![1.0, 0.0],
            },
            SymptomSample {
                features: vec![0.0, 1.0, 0.0],
                one_hot: vec![0.0, 1.0],
            },
        ];

        let batcher = SymptomBatcher::<NdArray>::new(NdArrayDevice::default());
        let batch = batcher.batch(samples);

        assert_eq!(batch.features.dims(), [2, 3]);
        assert_eq!(batch.targets.dims(), [2]);

        let targets: Vec<i64> = batch.targets.into_data().to_vec().unwrap();
        assert_eq!(targets, vec![0, 1]);
    }
}
