// ============================================================
// Layer 2 — Application Layer (Use Cases)
// ============================================================
// One use case per user-visible operation. Use cases own their
// configuration, wire the lower layers together, and are the only
// place where the full pipeline order is written down.

/// Offline training batch job: CSV → encoded tensors → trained artifact
pub mod train_use_case;

/// Online prediction: artifact → ranked top-3 predictions
pub mod predict_use_case;
