// ============================================================
// Layer 3 — StsRecord Domain Type
// ============================================================
// Represents one row of an input table for semantic textual
// similarity: two sentences, an optional similarity score,
// and an optional binary category used only for stratified
// splitting.
//
// The `id` column exists purely for traceability (it is never
// fed to the model, but the inference output must echo it).
//
// Field names follow the table headers, so serde can read a
// CSV row straight into this struct. The `binary-label` header
// contains a hyphen, hence the rename attribute.

use serde::{Deserialize, Serialize};

/// One raw sentence-pair row, immutable once read.
///
/// `label` is the regression target in [0, 5]; it is absent in
/// prediction tables. `binary_label` is a coarse 0/1 category
/// derived from the label, present only in training tables and
/// used only to stratify the holdout split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StsRecord {
    /// Row identifier, dropped before modeling
    pub id: String,

    /// First sentence of the pair
    pub sentence_1: String,

    /// Second sentence of the pair
    pub sentence_2: String,

    /// Similarity score target, absent in prediction tables
    #[serde(default)]
    pub label: Option<f32>,

    /// Stratification category, training tables only
    #[serde(rename = "binary-label", default)]
    pub binary_label: Option<f32>,
}

impl StsRecord {
    /// Create a new record. Uses impl Into<String> so callers
    /// can pass &str or String.
    pub fn new(
        id:         impl Into<String>,
        sentence_1: impl Into<String>,
        sentence_2: impl Into<String>,
    ) -> Self {
        Self {
            id:           id.into(),
            sentence_1:   sentence_1.into(),
            sentence_2:   sentence_2.into(),
            label:        None,
            binary_label: None,
        }
    }

    /// Attach a regression target to this record
    pub fn with_label(mut self, label: f32) -> Self {
        self.label = Some(label);
        self
    }

    /// Attach a stratification category to this record
    pub fn with_binary_label(mut self, binary_label: f32) -> Self {
        self.binary_label = Some(binary_label);
        self
    }
}
