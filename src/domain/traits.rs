// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// By programming against traits instead of concrete types,
// the application layer can swap implementations without
// changing the orchestration code:
//   - CsvLoader implements RecordSource
//   - StratifiedShuffleSplit and KFoldSplit implement
//     SplitStrategy, so the fit stage picks one at runtime
//     behind a Box<dyn SplitStrategy>
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::error::PipelineError;
use crate::domain::record::StsRecord;
use crate::domain::split::SplitAssignment;

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Any component that can load sentence-pair records.
///
/// Implementations:
///   - CsvLoader → reads a delimited table from disk
pub trait RecordSource {
    /// Load all records from this source, preserving row order.
    fn load_all(&self) -> Result<Vec<StsRecord>>;
}

// ─── SplitStrategy ────────────────────────────────────────────────────────────
/// A deterministic rule for partitioning record indices into
/// train and validation sets.
///
/// Implementations:
///   - StratifiedShuffleSplit → seeded ratio split preserving
///     the binary-label distribution
///   - KFoldSplit → seeded k-way partition, one fold held out
///
/// Determinism contract: the same strategy configuration applied
/// to the same record table must always return the same
/// assignment.
pub trait SplitStrategy {
    fn split(&self, records: &[StsRecord]) -> Result<SplitAssignment, PipelineError>;
}
