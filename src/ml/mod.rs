// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports from burn directly — only this one and
// the data batching step.
//
//   model.rs   — The fixed-topology feedforward classifier:
//                four ReLU hidden layers with interleaved
//                dropout, softmax over the disease labels at
//                inference. Also owns the conversion between
//                the live model and the portable artifact.
//
//   trainer.rs — The training loop: forward pass, cross-entropy
//                loss, backward pass, Adam step, epoch-cadence
//                reporting, artifact export on completion.
//
//   engine.rs  — The prediction engine: loads the artifact once
//                behind a guarded load-once transition, then
//                serves ranked top-3 predictions concurrently.

/// Feedforward classifier architecture + artifact conversion
pub mod model;

/// Full training loop with validation and artifact export
pub mod trainer;

/// Prediction engine — guarded lazy load, ranked inference
pub mod engine;
