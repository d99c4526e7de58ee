// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong to any one business
// layer:
//
//   artifact.rs — The persisted model artifact (topology + named
//                 weight tensors as one JSON document) and the
//                 file-based store with atomic replace. This is
//                 the interchange format between the offline
//                 trainer and the online prediction engine.
//
//   metrics.rs  — Training metrics logging. Writes epoch-level
//                 loss/accuracy to a CSV file for later analysis
//                 and plotting.

/// Model artifact document + file-based store
pub mod artifact;

/// Training metrics CSV logger
pub mod metrics;
