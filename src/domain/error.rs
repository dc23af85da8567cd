// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Typed errors for everything that can go wrong during
// preprocessing. Each variant is fatal for the stage that
// raised it: a failed `setup` never hands out a partial
// dataset, so the trainer either gets complete data or
// nothing.
//
// The application layer wraps these in anyhow::Result at the
// CLI boundary; inside the pipeline the variants stay typed so
// tests can match on them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A text field could not be tokenized. Surfaced immediately
    /// rather than skipped, otherwise input/target index
    /// alignment would silently corrupt.
    #[error("cannot tokenize text: {0}")]
    Encoding(String),

    /// The stratified split cannot honor the requested ratio or
    /// category distribution (e.g. a category with fewer than
    /// two records, or a record missing its category).
    #[error("insufficient data for split: {0}")]
    InsufficientData(String),

    /// Requested fold outside [0, num_folds)
    #[error("fold index {fold_index} out of range for {num_folds} folds")]
    InvalidFoldIndex { fold_index: usize, num_folds: usize },

    /// The training table is missing its target column. Test and
    /// predict tables degrade gracefully instead of raising this.
    #[error("training table has no usable '{0}' column")]
    MissingTarget(String),

    /// train_ratio outside the open interval (0, 1)
    #[error("train_ratio must be in (0, 1), got {0}")]
    InvalidRatio(f64),
}
