use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One encoded training example.
/// `features` is the N-length binary symptom vector; `one_hot` is the
/// M-length output vector with a single 1 at the true disease index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomSample {
    pub features: Vec<f32>,
    pub one_hot: Vec<f32>,
}

impl SymptomSample {
    /// Index of the hot entry — the class target for the loss.
    pub fn label_index(&self) -> usize {
        self.one_hot
            .iter()
            .position(|&v| v == 1.0)
            .unwrap_or_default()
    }
}

pub struct SymptomDataset {
    samples: Vec<SymptomSample>,
}

impl SymptomDataset {
    pub fn new(samples: Vec<SymptomSample>) -> Self {
        Self { samples }
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

impl Dataset<SymptomSample> for SymptomDataset {
    fn get(&self, index: usize) -> Option<SymptomSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_index_is_the_hot_position() {
        let sample = SymptomSample {
            features: vec![1.0, 0.0],
            one_hot: vec![0.0, 0.0, 1.0],
        };
        assert_eq!(sample.label_index(), 2);
    }

    #[test]
    fn dataset_exposes_len_and_get() {
        let ds = SymptomDataset::new(vec![
            SymptomSample { features: vec![1.0], one_hot: vec![1.0] };
            3
        ]);
        assert_eq!(ds.len(), 3);
        assert!(ds.get(2).is_some());
        assert!(ds.get(3).is_none());
    }
}
