// ============================================================
// Layer 4 — CSV Loader
// ============================================================
// Reads the labeled symptom dataset:
//
//   row 1:   N symptom-name columns + 1 trailing label column
//   row 2+:  N comma-separated 0/1 integers + 1 disease label
//
// The format has no quoting or escaping — simple comma splitting
// is the contract — so no CSV dialect handling is needed here.
// Cell *values* are validated later by the encoder; this module
// only enforces the structural shape (header present, every row's
// column count matching the header).

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::domain::error::PipelineError;

/// One structurally valid data row, 1-based source line retained for
/// error reporting downstream.
#[derive(Debug, Clone)]
pub struct RawRow {
    pub line: usize,
    /// The N symptom cells, in header column order.
    pub values: Vec<String>,
    /// The trailing disease label cell.
    pub label: String,
}

/// The parsed dataset: symptom column names plus all data rows.
#[derive(Debug, Clone)]
pub struct RawDataset {
    pub symptom_names: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Loads and structurally validates a symptom CSV file.
pub struct CsvLoader {
    path: String,
}

impl CsvLoader {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<RawDataset> {
        let content = fs::read_to_string(Path::new(&self.path))
            .with_context(|| format!("Cannot read dataset '{}'", self.path))?;

        let dataset = parse_csv(&content)?;
        tracing::info!(
            "Loaded {} rows with {} symptom columns from '{}'",
            dataset.rows.len(),
            dataset.symptom_names.len(),
            self.path,
        );
        Ok(dataset)
    }
}

/// Parse the full CSV text. Split out from the loader so the format
/// rules are testable without touching the filesystem.
pub fn parse_csv(content: &str) -> Result<RawDataset, PipelineError> {
    let mut lines = content.lines().enumerate();

    let header = loop {
        match lines.next() {
            Some((_, line)) if line.trim().is_empty() => continue,
            Some((_, line)) => break line,
            None => return Err(PipelineError::dataset("dataset is empty (no header row)")),
        }
    };

    let header_cells: Vec<String> = header.split(',').map(|c| c.trim().to_string()).collect();
    // At least one symptom column plus the trailing label column
    if header_cells.len() < 2 || header_cells.iter().all(|c| c.is_empty()) {
        return Err(PipelineError::dataset(format!(
            "header row must name at least one symptom column and the label column, got {} column(s)",
            header_cells.len(),
        )));
    }
    let expected_columns = header_cells.len();
    let symptom_names = header_cells[..expected_columns - 1].to_vec();

    let mut rows = Vec::new();
    for (idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<String> = line.split(',').map(|c| c.trim().to_string()).collect();
        if cells.len() != expected_columns {
            return Err(PipelineError::dataset(format!(
                "line {}: expected {} columns, found {}",
                idx + 1,
                expected_columns,
                cells.len(),
            )));
        }
        let label = cells[expected_columns - 1].clone();
        rows.push(RawRow {
            line: idx + 1,
            values: cells[..expected_columns - 1].to_vec(),
            label,
        });
    }

    Ok(RawDataset { symptom_names, rows })
}
