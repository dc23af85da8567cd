// ============================================================
// Layer 4 — Record Loader
// ============================================================
// Reads a delimited table (train/test/predict CSV) into typed
// StsRecords using the csv crate's serde integration.
//
// Expected columns:
//   id, sentence_1, sentence_2 — always present
//   label                      — absent in prediction tables
//   binary-label               — training tables only
//
// Missing optional columns simply deserialize to None; whether
// that is acceptable is decided by the stage that asked for the
// table (fit insists on labels, predict does not), not here.
// Row order is preserved so split assignments and the echoed
// ids in submission files stay index-aligned with the input.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::domain::record::StsRecord;
use crate::domain::traits::RecordSource;

/// Loads sentence-pair records from one CSV file.
/// Implements the RecordSource trait from Layer 3.
pub struct CsvLoader {
    path: PathBuf,
}

impl CsvLoader {
    /// Create a new CsvLoader pointed at a table file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for CsvLoader {
    fn load_all(&self) -> Result<Vec<StsRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .with_context(|| format!("cannot open table '{}'", self.path.display()))?;

        let mut records = Vec::new();
        for (row, result) in reader.deserialize::<StsRecord>().enumerate() {
            // A malformed row is fatal: silently dropping it would
            // shift every later index out of alignment.
            let record = result.with_context(|| {
                format!("malformed row {} in '{}'", row + 1, self.path.display())
            })?;
            records.push(record);
        }

        tracing::info!(
            "Loaded {} records from '{}'",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }
}
