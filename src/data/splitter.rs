// ============================================================
// Layer 4 — Split Strategies
// ============================================================
// Two deterministic ways of carving a record table into train
// and validation partitions:
//
//   StratifiedShuffleSplit
//     Ratio split that preserves the binary-label distribution.
//     Each category is shuffled and split independently, so a
//     table that is 30% category-1 yields partitions that are
//     each ~30% category-1.
//
//   KFoldSplit
//     Seeded shuffle of all indices, cut into num_folds groups
//     of near-equal size (the first n % k groups get one extra,
//     matching the usual k-fold convention). The group at
//     fold_index becomes validation; the rest concatenate into
//     train. Re-running with the same seed and num_folds always
//     reproduces the same group membership, so k experiments
//     with fold_index 0..k rotate through disjoint validation
//     sets.
//
// Both strategies take an explicit seed; there is no ambient
// process-wide RNG state anywhere in the pipeline.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom over a
// seeded StdRng.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::domain::error::PipelineError;
use crate::domain::record::StsRecord;
use crate::domain::split::SplitAssignment;
use crate::domain::traits::SplitStrategy;

// ─── StratifiedShuffleSplit ───────────────────────────────────────────────────

/// Seeded ratio split that preserves the marginal distribution
/// of the binary-label field across both partitions.
#[derive(Debug, Clone)]
pub struct StratifiedShuffleSplit {
    train_ratio: f64,
    seed: u64,
}

impl StratifiedShuffleSplit {
    pub fn new(train_ratio: f64, seed: u64) -> Self {
        Self { train_ratio, seed }
    }
}

impl SplitStrategy for StratifiedShuffleSplit {
    fn split(&self, records: &[StsRecord]) -> Result<SplitAssignment, PipelineError> {
        if !(self.train_ratio > 0.0 && self.train_ratio < 1.0) {
            return Err(PipelineError::InvalidRatio(self.train_ratio));
        }
        if records.is_empty() {
            return Err(PipelineError::InsufficientData(
                "cannot split an empty record table".to_string(),
            ));
        }

        // Group record indices by stratification category.
        // Keyed by the bit pattern of the categorical value in a
        // BTreeMap, so iteration order (and with it the seeded
        // shuffle stream) is deterministic.
        let mut by_category: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for (index, record) in records.iter().enumerate() {
            match record.binary_label {
                Some(value) => by_category.entry(value.to_bits()).or_default().push(index),
                None => {
                    return Err(PipelineError::InsufficientData(format!(
                        "record {} ('{}') has no binary-label to stratify on",
                        index, record.id
                    )));
                }
            }
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut train = Vec::new();
        let mut validation = Vec::new();

        for (key, mut indices) in by_category {
            let count = indices.len();
            if count < 2 {
                return Err(PipelineError::InsufficientData(format!(
                    "category {} has only {} record(s); need at least 2 \
                     to place one on each side of the split",
                    f32::from_bits(key),
                    count
                )));
            }

            // Fisher-Yates shuffle, then cut at the ratio point.
            // Clamped so every category lands at least one record
            // on each side.
            indices.shuffle(&mut rng);
            let cut = ((count as f64) * self.train_ratio).round() as usize;
            let cut = cut.clamp(1, count - 1);

            train.extend_from_slice(&indices[..cut]);
            validation.extend_from_slice(&indices[cut..]);
        }

        // Sorted output: downstream encoding walks the table in
        // stable record order regardless of shuffle history.
        train.sort_unstable();
        validation.sort_unstable();

        tracing::debug!(
            "Stratified split: {} train, {} validation (ratio {:.2}, seed {})",
            train.len(),
            validation.len(),
            self.train_ratio,
            self.seed,
        );

        Ok(SplitAssignment::new(train, validation))
    }
}

// ─── KFoldSplit ───────────────────────────────────────────────────────────────

/// Seeded k-way partition. The fold at `fold_index` is held out
/// as validation; the remaining folds form the training set.
#[derive(Debug, Clone)]
pub struct KFoldSplit {
    num_folds: usize,
    fold_index: usize,
    seed: u64,
}

impl KFoldSplit {
    pub fn new(num_folds: usize, fold_index: usize, seed: u64) -> Self {
        Self { num_folds, fold_index, seed }
    }
}

impl SplitStrategy for KFoldSplit {
    fn split(&self, records: &[StsRecord]) -> Result<SplitAssignment, PipelineError> {
        if self.fold_index >= self.num_folds {
            return Err(PipelineError::InvalidFoldIndex {
                fold_index: self.fold_index,
                num_folds: self.num_folds,
            });
        }
        if self.num_folds < 2 || self.num_folds > records.len() {
            return Err(PipelineError::InsufficientData(format!(
                "{} fold(s) requested over {} record(s); need \
                 2 <= num_folds <= record count",
                self.num_folds,
                records.len()
            )));
        }

        let mut indices: Vec<usize> = (0..records.len()).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        indices.shuffle(&mut rng);

        // Fold sizes: n / k each, with the first n % k folds
        // taking one extra so every index is assigned.
        let base = indices.len() / self.num_folds;
        let remainder = indices.len() % self.num_folds;

        let mut folds: Vec<Vec<usize>> = Vec::with_capacity(self.num_folds);
        let mut start = 0usize;
        for fold in 0..self.num_folds {
            let size = base + usize::from(fold < remainder);
            folds.push(indices[start..start + size].to_vec());
            start += size;
        }

        let mut validation = folds.remove(self.fold_index);
        let mut train: Vec<usize> = folds.into_iter().flatten().collect();

        train.sort_unstable();
        validation.sort_unstable();

        tracing::debug!(
            "K-fold split: fold {}/{} held out, {} train, {} validation (seed {})",
            self.fold_index,
            self.num_folds,
            train.len(),
            validation.len(),
            self.seed,
        );

        Ok(SplitAssignment::new(train, validation))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    /// n records with binary-label cycling through `categories`
    fn records_with_categories(categories: &[f32]) -> Vec<StsRecord> {
        categories
            .iter()
            .enumerate()
            .map(|(i, &cat)| {
                StsRecord::new(format!("r{i}"), format!("left {i}"), format!("right {i}"))
                    .with_label(2.5)
                    .with_binary_label(cat)
            })
            .collect()
    }

    fn assert_disjoint_exhaustive(assignment: &SplitAssignment, total: usize) {
        let mut seen = vec![false; total];
        for &idx in assignment.train.iter().chain(assignment.validation.iter()) {
            assert!(!seen[idx], "index {idx} assigned twice");
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s), "some index never assigned");
    }

    #[test]
    fn test_stratified_disjoint_and_exhaustive() {
        let records = records_with_categories(&[0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
        let assignment = StratifiedShuffleSplit::new(0.75, 7).split(&records).unwrap();
        assert_disjoint_exhaustive(&assignment, records.len());
    }

    #[test]
    fn test_stratified_is_deterministic() {
        let records = records_with_categories(&[0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0]);
        let first = StratifiedShuffleSplit::new(0.8, 1004).split(&records).unwrap();
        let second = StratifiedShuffleSplit::new(0.8, 1004).split(&records).unwrap();
        assert_eq!(first, second);

        // A different seed is allowed to (and here does) move records
        let third = StratifiedShuffleSplit::new(0.8, 1005).split(&records).unwrap();
        assert_eq!(third.len(), first.len());
    }

    #[test]
    fn test_stratified_preserves_category_proportion() {
        // 40 records, 25% category 1
        let categories: Vec<f32> = (0..40)
            .map(|i| if i % 4 == 0 { 1.0 } else { 0.0 })
            .collect();
        let records = records_with_categories(&categories);
        let assignment = StratifiedShuffleSplit::new(0.8, 42).split(&records).unwrap();

        let val_ones = assignment
            .validation
            .iter()
            .filter(|&&i| records[i].binary_label == Some(1.0))
            .count();
        let proportion = val_ones as f64 / assignment.validation.len() as f64;
        assert!(
            (proportion - 0.25).abs() < 0.05,
            "validation proportion {proportion} drifted from 0.25"
        );
    }

    #[test]
    fn test_stratified_four_row_example() {
        // binary-label [0, 0, 1, 1] at ratio 0.5: two rows on each
        // side, one of each category in each partition
        let records = records_with_categories(&[0.0, 0.0, 1.0, 1.0]);
        let assignment = StratifiedShuffleSplit::new(0.5, 9).split(&records).unwrap();

        assert_eq!(assignment.train.len(), 2);
        assert_eq!(assignment.validation.len(), 2);
        for side in [&assignment.train, &assignment.validation] {
            let ones = side
                .iter()
                .filter(|&&i| records[i].binary_label == Some(1.0))
                .count();
            assert_eq!(ones, 1, "each partition holds one of each category");
        }
    }

    #[test]
    fn test_stratified_rejects_tiny_category() {
        let records = records_with_categories(&[0.0, 0.0, 0.0, 1.0]);
        let result = StratifiedShuffleSplit::new(0.8, 42).split(&records);
        assert!(matches!(result, Err(PipelineError::InsufficientData(_))));
    }

    #[test]
    fn test_stratified_rejects_missing_category() {
        let mut records = records_with_categories(&[0.0, 0.0, 1.0, 1.0]);
        records[2].binary_label = None;
        let result = StratifiedShuffleSplit::new(0.8, 42).split(&records);
        assert!(matches!(result, Err(PipelineError::InsufficientData(_))));
    }

    #[test]
    fn test_stratified_rejects_bad_ratio() {
        let records = records_with_categories(&[0.0, 0.0, 1.0, 1.0]);
        for ratio in [0.0, 1.0, 1.5, -0.2] {
            let result = StratifiedShuffleSplit::new(ratio, 42).split(&records);
            assert!(matches!(result, Err(PipelineError::InvalidRatio(_))));
        }
    }

    #[test]
    fn test_kfold_disjoint_and_exhaustive_across_folds() {
        let records = records_with_categories(&[0.0; 13]);
        let num_folds = 5;

        // Union of every fold's validation set must cover all
        // indices exactly once
        let mut seen = vec![0usize; records.len()];
        for fold_index in 0..num_folds {
            let assignment = KFoldSplit::new(num_folds, fold_index, 12345)
                .split(&records)
                .unwrap();
            assert_disjoint_exhaustive(&assignment, records.len());
            for &idx in &assignment.validation {
                seen[idx] += 1;
            }
        }
        assert!(seen.iter().all(|&c| c == 1), "folds overlap or miss indices");
    }

    #[test]
    fn test_kfold_fold_sizes() {
        // 13 records over 5 folds: sizes 3, 3, 3, 2, 2
        let records = records_with_categories(&[0.0; 13]);
        let sizes: Vec<usize> = (0..5)
            .map(|f| {
                KFoldSplit::new(5, f, 12345)
                    .split(&records)
                    .unwrap()
                    .validation
                    .len()
            })
            .collect();
        assert_eq!(sizes, vec![3, 3, 3, 2, 2]);
    }

    #[test]
    fn test_kfold_is_deterministic() {
        let records = records_with_categories(&[0.0; 20]);
        let first = KFoldSplit::new(4, 2, 12345).split(&records).unwrap();
        let second = KFoldSplit::new(4, 2, 12345).split(&records).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_kfold_rejects_out_of_range_fold() {
        let records = records_with_categories(&[0.0; 10]);
        let result = KFoldSplit::new(5, 5, 1).split(&records);
        assert!(matches!(
            result,
            Err(PipelineError::InvalidFoldIndex { fold_index: 5, num_folds: 5 })
        ));
    }

    #[test]
    fn test_kfold_rejects_more_folds_than_records() {
        let records = records_with_categories(&[0.0; 3]);
        let result = KFoldSplit::new(5, 0, 1).split(&records);
        assert!(matches!(result, Err(PipelineError::InsufficientData(_))));
    }
}
