// ============================================================
// Layer 4 — Dataset Encoder
// ============================================================
// Converts structurally valid raw rows into trainable samples:
// an N-length binary feature vector per row plus a one-hot
// output vector over the M disease labels.
//
// The pass is pure and repeatable — encoding the same dataset
// twice yields bit-identical samples, which keeps training runs
// reproducible from the raw CSV alone.

use crate::data::dataset::SymptomSample;
use crate::data::loader::RawDataset;
use crate::domain::error::PipelineError;
use crate::domain::vocabulary::DiseaseLabelSet;

/// Encode every row of `raw` against the given label set.
///
/// The label set is normally derived from the same dataset, in which
/// case `UnknownLabel` is unreachable — but it must still be checked,
/// because callers may encode an externally supplied dataset against a
/// previously frozen label set.
pub fn encode_dataset(
    raw: &RawDataset,
    labels: &DiseaseLabelSet,
) -> Result<Vec<SymptomSample>, PipelineError> {
    let mut samples = Vec::with_capacity(raw.rows.len());

    for row in &raw.rows {
        let mut features = Vec::with_capacity(row.values.len());
        for (col, cell) in row.values.iter().enumerate() {
            features.push(parse_binary_cell(cell, row.line, &raw.symptom_names[col])?);
        }

        let label_index =
            labels
                .index_of(&row.label)
                .ok_or_else(|| PipelineError::UnknownLabel {
                    label: row.label.clone(),
                    line: row.line,
                })?;
        let mut one_hot = vec![0.0f32; labels.len()];
        one_hot[label_index] = 1.0;

        samples.push(SymptomSample { features, one_hot });
    }

    Ok(samples)
}

/// A cell is valid iff it parses as the integer 0 or 1.
fn parse_binary_cell(cell: &str, line: usize, column: &str) -> Result<f32, PipelineError> {
    match cell.parse::<i64>() {
        Ok(0) => Ok(0.0),
        Ok(1) => Ok(1.0),
        Ok(other) => Err(PipelineError::dataset(format!(
            "line {line}, column '{column}': symptom value must be 0 or 1, got {other}",
        ))),
        Err(_) => Err(PipelineError::dataset(format!(
            "line {line}, column '{column}': symptom value must be 0 or 1, got '{cell}'",
        ))),
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv;

    const CSV: &str = "\
itching,skin_rash,fatigue,prognosis
1,1,0,Fungal infection
0,0,1,Chronic fatigue
1,0,1,Fungal infection
";

    fn raw() -> RawDataset {
        parse_csv(CSV).unwrap()
    }

    fn labels(raw: &RawDataset) -> DiseaseLabelSet {
        DiseaseLabelSet::from_labels(raw.rows.iter().map(|r| r.label.as_str()))
    }

    #[test]
    fn every_sample_is_exactly_one_hot() {
        let raw = raw();
        let labels = labels(&raw);
        let samples = encode_dataset(&raw, &labels).unwrap();
        assert_eq!(samples.len(), 3);
        for sample in &samples {
            let hot: Vec<&f32> = sample.one_hot.iter().filter(|&&v| v == 1.0).collect();
            let cold = sample.one_hot.iter().filter(|&&v| v == 0.0).count();
            assert_eq!(hot.len(), 1);
            assert_eq!(hot.len() + cold, sample.one_hot.len());
        }
    }

    #[test]
    fn features_are_binary_and_in_column_order() {
        let raw = raw();
        let labels = labels(&raw);
        let samples = encode_dataset(&raw, &labels).unwrap();
        assert_eq!(samples[0].features, vec![1.0, 1.0, 0.0]);
        assert_eq!(samples[1].features, vec![0.0, 0.0, 1.0]);
        assert_eq!(samples[0].label_index(), samples[2].label_index());
    }

    #[test]
    fn encoding_is_deterministic() {
        let raw = raw();
        let labels = labels(&raw);
        let first = encode_dataset(&raw, &labels).unwrap();
        let second = encode_dataset(&raw, &labels).unwrap();
        for (a, b) in first.iter().zip(&second) {
            // Bit-identical, not merely approximately equal
            assert_eq!(a.features, b.features);
            assert_eq!(a.one_hot, b.one_hot);
        }
    }

    #[test]
    fn rejects_non_binary_values() {
        let bad = parse_csv("itching,prognosis\n2,Allergy\n").unwrap();
        let labels = DiseaseLabelSet::from_labels(["Allergy"]);
        let err = encode_dataset(&bad, &labels).unwrap_err();
        match err {
            PipelineError::DatasetFormat { detail } => {
                assert!(detail.contains("itching"));
                assert!(detail.contains("got 2"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_non_numeric_values() {
        let bad = parse_csv("itching,prognosis\nyes,Allergy\n").unwrap();
        let labels = DiseaseLabelSet::from_labels(["Allergy"]);
        assert!(matches!(
            encode_dataset(&bad, &labels),
            Err(PipelineError::DatasetFormat { .. })
        ));
    }

    #[test]
    fn rejects_label_missing_from_external_label_set() {
        let raw = raw();
        let external = DiseaseLabelSet::from_labels(["Fungal infection"]);
        let err = encode_dataset(&raw, &external).unwrap_err();
        match err {
            PipelineError::UnknownLabel { label, line } => {
                assert_eq!(label, "Chronic fatigue");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
