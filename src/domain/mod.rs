// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs, enums, and traits defining the core
// concepts of the prediction pipeline.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or network calls
//   - Only plain Rust structs, enums, and traits

// The typed pipeline error taxonomy
pub mod error;

// Symptom vocabulary and disease label set (positional index mappings)
pub mod vocabulary;

// Ranked prediction results and the structured prediction report
pub mod prediction;

// Condition assessments returned by the free-text analyzer collaborator
pub mod assessment;

// Core abstractions (traits) that other layers implement
pub mod traits;
