// ============================================================
// Layer 3 — Free-Text Condition Assessments
// ============================================================
// Types for the external free-text symptom analyzer collaborator.
// The analyzer itself is an opaque, best-effort service owned by
// another process; the core only defines the shape of its answers
// and the fixed fallbacks it degrades to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Triage severity attached to an assessed condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Moderate,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Moderate => write!(f, "moderate"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// One condition/severity/recommendation triple from the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionAssessment {
    pub condition: String,
    pub severity: Severity,
    pub recommendation: String,
}

impl ConditionAssessment {
    /// Fallback when the analyzer responded but its answer could not be
    /// interpreted.
    pub fn unable_to_analyze() -> Self {
        Self {
            condition: "Unable to analyze symptoms".to_string(),
            severity: Severity::Moderate,
            recommendation: "Please consult with a doctor for proper diagnosis".to_string(),
        }
    }

    /// Fallback when the analyzer could not be reached at all.
    pub fn service_unavailable() -> Self {
        Self {
            condition: "Analysis service unavailable".to_string(),
            severity: Severity::Moderate,
            recommendation: "Please manually assess the patient or try again later".to_string(),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_round_trips_as_lowercase() {
        let json = serde_json::to_string(&Severity::Moderate).unwrap();
        assert_eq!(json, "\"moderate\"");
        let back: Severity = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(back, Severity::High);
    }

    #[test]
    fn fallbacks_are_moderate_severity() {
        assert_eq!(ConditionAssessment::unable_to_analyze().severity, Severity::Moderate);
        assert_eq!(ConditionAssessment::service_unavailable().severity, Severity::Moderate);
    }
}
