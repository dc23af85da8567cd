// ============================================================
// Layer 3 — SplitAssignment Domain Type
// ============================================================
// The result of running a split strategy over a record table:
// every record index lands in exactly one of the two sides.
//
// Invariants (checked by the strategy tests):
//   - train ∪ validation covers every index exactly once
//   - train ∩ validation is empty
//   - the same strategy + seed + table always reproduces the
//     same assignment
//
// Indices refer back into the original record Vec; the records
// themselves are not copied here.

/// A disjoint, exhaustive train/validation partition of record
/// indices. Both sides are kept sorted so downstream encoding
/// walks the table in a stable order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitAssignment {
    /// Record indices assigned to the training partition
    pub train: Vec<usize>,

    /// Record indices assigned to the validation partition
    pub validation: Vec<usize>,
}

impl SplitAssignment {
    pub fn new(train: Vec<usize>, validation: Vec<usize>) -> Self {
        Self { train, validation }
    }

    /// Total number of assigned record indices
    pub fn len(&self) -> usize {
        self.train.len() + self.validation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.train.is_empty() && self.validation.is_empty()
    }
}
