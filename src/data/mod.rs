// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from the raw CSV file to tensor batches:
//
//   symptoms CSV
//       │
//       ▼
//   CsvLoader         → header + validated raw rows
//       │
//       ▼
//   (vocabulary)      → symptom/label index mappings (domain)
//       │
//       ▼
//   encoder           → binary input vectors + one-hot outputs
//       │
//       ▼
//   SymptomDataset    → implements Burn's Dataset trait
//       │
//       ▼
//   SymptomBatcher    → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Each module is responsible for exactly one step.

/// Parses the symptom CSV (header row + 0/1 rows with a trailing label)
pub mod loader;

/// Converts raw rows into binary input vectors and one-hot outputs
pub mod encoder;

/// Implements Burn's Dataset trait for encoded symptom samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Shuffles and splits data into train/validation sets
pub mod splitter;
