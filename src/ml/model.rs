use burn::{
    nn::{Dropout, DropoutConfig, Initializer, Linear, LinearConfig},
    prelude::*,
    tensor::activation::{relu, softmax},
    tensor::backend::AutodiffBackend,
};
use burn::module::Param;

use crate::domain::error::PipelineError;
use crate::domain::vocabulary::{DiseaseLabelSet, SymptomVocabulary};
use crate::infra::artifact::{
    Activation, LayerSpec, ModelArtifact, ModelTopology, WeightTensor, ARTIFACT_FORMAT_VERSION,
};

/// Hidden layer widths of the fixed topology. Only the input width N
/// and output width M vary, discovered from the vocabulary and label
/// set at training time.
pub const HIDDEN_WIDTHS: [usize; 4] = [64, 48, 32, 24];

/// Dropout rates between the hidden layers. Dropout is active only on
/// an autodiff backend (training); on the inference backend it is the
/// identity, so prediction is deterministic.
pub const DROPOUT_RATES: [f64; 3] = [0.3, 0.3, 0.2];

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct DiseaseNetConfig {
    pub num_symptoms: usize,
    pub num_diseases: usize,
}

impl DiseaseNetConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> DiseaseNet<B> {
        let [h1, h2, h3, h4] = HIDDEN_WIDTHS;
        let [d1, d2, d3] = DROPOUT_RATES;

        // He-normal init on the input layer, gain √2 for ReLU fan-in
        let fc1 = LinearConfig::new(self.num_symptoms, h1)
            .with_initializer(Initializer::KaimingNormal {
                gain: std::f64::consts::SQRT_2,
                fan_out_only: false,
            })
            .init(device);
        let fc2 = LinearConfig::new(h1, h2).init(device);
        let fc3 = LinearConfig::new(h2, h3).init(device);
        let fc4 = LinearConfig::new(h3, h4).init(device);
        let out = LinearConfig::new(h4, self.num_diseases).init(device);

        DiseaseNet {
            fc1,
            fc2,
            fc3,
            fc4,
            out,
            drop1: DropoutConfig::new(d1).init(),
            drop2: DropoutConfig::new(d2).init(),
            drop3: DropoutConfig::new(d3).init(),
        }
    }
}

/// Feedforward disease classifier:
///
///   Dense(N→64, ReLU) → Dropout(0.3) →
///   Dense(64→48, ReLU) → Dropout(0.3) →
///   Dense(48→32, ReLU) → Dropout(0.2) →
///   Dense(32→24, ReLU) → Dense(24→M)
///
/// `forward` returns logits; the softmax lives in `infer` (serving)
/// and inside the cross-entropy loss (training).
#[derive(Module, Debug)]
pub struct DiseaseNet<B: Backend> {
    pub fc1: Linear<B>,
    pub fc2: Linear<B>,
    pub fc3: Linear<B>,
    pub fc4: Linear<B>,
    pub out: Linear<B>,
    pub drop1: Dropout,
    pub drop2: Dropout,
    pub drop3: Dropout,
}

impl<B: Backend> DiseaseNet<B> {
    /// features: [batch, N] → logits: [batch, M]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.drop1.forward(relu(self.fc1.forward(features)));
        let x = self.drop2.forward(relu(self.fc2.forward(x)));
        let x = self.drop3.forward(relu(self.fc3.forward(x)));
        let x = relu(self.fc4.forward(x));
        self.out.forward(x)
    }

    /// features: [batch, N] → per-class confidences: [batch, M],
    /// each row a probability distribution summing to 1.
    pub fn infer(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        softmax(self.forward(features), 1)
    }

    /// Categorical cross-entropy over the softmax distribution,
    /// expressed as integer-target cross-entropy on the logits.
    pub fn forward_loss(
        &self,
        features: Tensor<B, 2>,
        targets: Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>)
    where
        B: AutodiffBackend,
    {
        let logits = self.forward(features);
        let ce = burn::nn::loss::CrossEntropyLossConfig::new().init(&logits.device());
        let loss = ce.forward(logits.clone(), targets);
        (loss, logits)
    }

    fn linears(&self) -> [&Linear<B>; 5] {
        [&self.fc1, &self.fc2, &self.fc3, &self.fc4, &self.out]
    }

    /// Extract the trained topology and per-layer weight tensors into a
    /// portable artifact. Tensors are emitted in layer order, kernel
    /// before bias, with flat row-major payloads.
    pub fn to_artifact(
        &self,
        vocabulary: &SymptomVocabulary,
        labels: &DiseaseLabelSet,
    ) -> Result<ModelArtifact, PipelineError> {
        let mut weights_data = Vec::with_capacity(self.linears().len() * 2);

        for (i, linear) in self.linears().into_iter().enumerate() {
            let kernel = linear.weight.val();
            let [fan_in, fan_out] = kernel.dims();
            weights_data.push(WeightTensor {
                name: format!("dense_{i}/kernel"),
                shape: vec![fan_in, fan_out],
                data: tensor_payload(kernel.into_data())?,
            });

            let bias = linear
                .bias
                .as_ref()
                .ok_or_else(|| PipelineError::corrupt(format!("dense_{i} has no bias tensor")))?
                .val();
            weights_data.push(WeightTensor {
                name: format!("dense_{i}/bias"),
                shape: vec![fan_out],
                data: tensor_payload(bias.into_data())?,
            });
        }

        let artifact = ModelArtifact {
            model_topology: topology_for(vocabulary, labels),
            weights_data,
        };
        artifact.validate()?;
        Ok(artifact)
    }

    /// Rebuild a model from a validated artifact, placing every weight
    /// tensor back into its layer. The declared layer stack must match
    /// the fixed architecture compiled into this crate.
    pub fn from_artifact(
        artifact: &ModelArtifact,
        device: &B::Device,
    ) -> Result<Self, PipelineError> {
        artifact.validate()?;
        let topo = &artifact.model_topology;

        let expected = canonical_layers(topo.output_dim);
        if topo.layers != expected {
            return Err(PipelineError::corrupt(
                "artifact declares a layer stack this build does not support",
            ));
        }

        let mut model = DiseaseNetConfig::new(topo.input_dim, topo.output_dim).init::<B>(device);
        let dims = topo.dense_dims();
        let linears: [&mut Linear<B>; 5] = [
            &mut model.fc1,
            &mut model.fc2,
            &mut model.fc3,
            &mut model.fc4,
            &mut model.out,
        ];

        for (i, linear) in linears.into_iter().enumerate() {
            let (fan_in, fan_out) = dims[i];
            let kernel = &artifact.weights_data[i * 2];
            let bias = &artifact.weights_data[i * 2 + 1];

            let weight = Tensor::<B, 1>::from_floats(kernel.data.as_slice(), device)
                .reshape([fan_in, fan_out]);
            linear.weight = Param::from_tensor(weight);

            let bias = Tensor::<B, 1>::from_floats(bias.data.as_slice(), device);
            linear.bias = Some(Param::from_tensor(bias));
        }

        Ok(model)
    }
}

/// The canonical topology descriptor for a given vocabulary/label set.
pub fn topology_for(vocabulary: &SymptomVocabulary, labels: &DiseaseLabelSet) -> ModelTopology {
    ModelTopology {
        format_version: ARTIFACT_FORMAT_VERSION,
        input_dim: vocabulary.len(),
        output_dim: labels.len(),
        layers: canonical_layers(labels.len()),
        symptom_vocabulary: vocabulary.as_slice().to_vec(),
        disease_labels: labels.as_slice().to_vec(),
    }
}

fn canonical_layers(output_dim: usize) -> Vec<LayerSpec> {
    let [h1, h2, h3, h4] = HIDDEN_WIDTHS;
    let [d1, d2, d3] = DROPOUT_RATES;
    vec![
        LayerSpec::Dense { units: h1, activation: Activation::Relu },
        LayerSpec::Dropout { rate: d1 },
        LayerSpec::Dense { units: h2, activation: Activation::Relu },
        LayerSpec::Dropout { rate: d2 },
        LayerSpec::Dense { units: h3, activation: Activation::Relu },
        LayerSpec::Dropout { rate: d3 },
        LayerSpec::Dense { units: h4, activation: Activation::Relu },
        LayerSpec::Dense { units: output_dim, activation: Activation::Softmax },
    ]
}

fn tensor_payload(data: burn::tensor::TensorData) -> Result<Vec<f32>, PipelineError> {
    data.to_vec::<f32>()
        .map_err(|e| PipelineError::corrupt(format!("weight tensor readback failed: {e:?}")))
}
