// ============================================================
// Layer 6 — Submission Writer
// ============================================================
// Turns raw model predictions into the three submission tables
// the scoring pipeline expects, all with columns `id,target`:
//
//   output.csv            — raw predictions, rounded to one
//                           decimal place
//   output_normalized.csv — rounded predictions rescaled so the
//                           rounded min/max span the target
//                           range: round(range * x / (max - min
//                           + 1e-8), 1)
//   output_ensembled.csv  — per-row mean of the raw and
//                           normalized columns, rounded to one
//                           decimal place
//
// The ids are echoed from the prediction input so rows stay
// aligned with the original predict table.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One `id,target` row of a prediction or submission table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub target: f32,
}

/// Paths of the three written tables
#[derive(Debug, Clone)]
pub struct SubmissionPaths {
    pub raw: PathBuf,
    pub normalized: PathBuf,
    pub ensembled: PathBuf,
}

/// Round to one decimal place, the precision the leaderboard
/// scores at.
fn round1(x: f32) -> f32 {
    (x * 10.0).round() / 10.0
}

/// Rescale rounded predictions so their min/max span `range`.
/// Keeps the x / (max - min + eps) form, including the epsilon
/// guard against a constant prediction column.
pub fn normalize_predictions(rounded: &[f32], range: f32) -> Vec<f32> {
    let min = rounded.iter().copied().fold(f32::INFINITY, f32::min);
    let max = rounded.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let span = max - min + 1e-8;
    rounded.iter().map(|&x| round1(range * x / span)).collect()
}

/// Writes the three submission tables into one directory.
pub struct SubmissionWriter {
    out_dir: PathBuf,
    target_range: f32,
}

impl SubmissionWriter {
    pub fn new(out_dir: impl Into<PathBuf>, target_range: f32) -> Self {
        Self { out_dir: out_dir.into(), target_range }
    }

    /// Round, normalize, ensemble, and persist. `ids` and `raw`
    /// must be index-aligned.
    pub fn write_all(&self, ids: &[String], raw: &[f32]) -> Result<SubmissionPaths> {
        anyhow::ensure!(
            ids.len() == raw.len(),
            "{} id(s) but {} prediction(s)",
            ids.len(),
            raw.len()
        );
        std::fs::create_dir_all(&self.out_dir).with_context(|| {
            format!("cannot create output directory '{}'", self.out_dir.display())
        })?;

        let rounded: Vec<f32> = raw.iter().map(|&x| round1(x)).collect();
        let normalized = normalize_predictions(&rounded, self.target_range);
        let ensembled: Vec<f32> = rounded
            .iter()
            .zip(&normalized)
            .map(|(&a, &b)| round1((a + b) / 2.0))
            .collect();

        let paths = SubmissionPaths {
            raw:        self.out_dir.join("output.csv"),
            normalized: self.out_dir.join("output_normalized.csv"),
            ensembled:  self.out_dir.join("output_ensembled.csv"),
        };
        write_table(&paths.raw, ids, &rounded)?;
        write_table(&paths.normalized, ids, &normalized)?;
        write_table(&paths.ensembled, ids, &ensembled)?;

        tracing::info!(
            "Wrote {} prediction(s) to '{}' (raw, normalized, ensembled)",
            ids.len(),
            self.out_dir.display()
        );
        Ok(paths)
    }
}

fn write_table(path: &Path, ids: &[String], values: &[f32]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("cannot create '{}'", path.display()))?;
    for (id, &target) in ids.iter().zip(values) {
        writer.serialize(Prediction { id: id.clone(), target })?;
    }
    writer.flush()?;
    Ok(())
}

/// Read an `id,target` prediction table back (the postprocess
/// command's input).
pub fn read_predictions(path: impl AsRef<Path>) -> Result<(Vec<String>, Vec<f32>)> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("cannot open predictions '{}'", path.display()))?;

    let mut ids = Vec::new();
    let mut values = Vec::new();
    for result in reader.deserialize::<Prediction>() {
        let row = result.with_context(|| format!("malformed row in '{}'", path.display()))?;
        ids.push(row.id);
        values.push(row.target);
    }
    Ok((ids, values))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_round1() {
        assert!(approx_eq(round1(3.44), 3.4));
        assert!(approx_eq(round1(3.45001), 3.5));
        assert!(approx_eq(round1(-0.04), -0.0));
    }

    #[test]
    fn test_normalize_spans_target_range() {
        let rounded = vec![0.0, 2.5, 5.0];
        let normalized = normalize_predictions(&rounded, 5.0);
        // span = 5.0, so values map to range * x / span = x
        assert!(approx_eq(normalized[0], 0.0));
        assert!(approx_eq(normalized[1], 2.5));
        assert!(approx_eq(normalized[2], 5.0));
    }

    #[test]
    fn test_normalize_constant_column_does_not_divide_by_zero() {
        let normalized = normalize_predictions(&[2.0, 2.0, 2.0], 5.0);
        assert!(normalized.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_write_all_produces_three_aligned_tables() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SubmissionWriter::new(dir.path(), 5.0);

        let ids: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let raw = vec![1.04, 2.56, 4.99];
        let paths = writer.write_all(&ids, &raw).unwrap();

        let (raw_ids, raw_values) = read_predictions(&paths.raw).unwrap();
        assert_eq!(raw_ids, ids);
        assert!(approx_eq(raw_values[0], 1.0));
        assert!(approx_eq(raw_values[1], 2.6));
        assert!(approx_eq(raw_values[2], 5.0));

        let (norm_ids, norm_values) = read_predictions(&paths.normalized).unwrap();
        assert_eq!(norm_ids, ids);
        // span = 5.0 - 1.0 = 4.0; round(5 * 1.0 / 4.0, 1) = 1.3
        assert!(approx_eq(norm_values[0], 1.3));

        let (ens_ids, ens_values) = read_predictions(&paths.ensembled).unwrap();
        assert_eq!(ens_ids, ids);
        // mean of 1.0 and 1.3, rounded
        assert!(approx_eq(ens_values[0], 1.2));
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SubmissionWriter::new(dir.path(), 5.0);
        let result = writer.write_all(&["a".to_string()], &[1.0, 2.0]);
        assert!(result.is_err());
    }

    #[test]
    fn test_every_written_value_has_one_decimal() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SubmissionWriter::new(dir.path(), 5.0);
        let ids: Vec<String> = (0..5).map(|i| format!("r{i}")).collect();
        let raw = vec![0.123, 1.987, 3.456, 2.001, 4.449];
        let paths = writer.write_all(&ids, &raw).unwrap();

        for path in [&paths.raw, &paths.normalized, &paths.ensembled] {
            let (_, values) = read_predictions(path).unwrap();
            for v in values {
                assert!(
                    approx_eq(v * 10.0, (v * 10.0).round()),
                    "{v} in {} is not one-decimal",
                    path.display()
                );
            }
        }
    }
}
