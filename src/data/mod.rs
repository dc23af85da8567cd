// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from raw CSV tables all the
// way to tensor batches ready for the external trainer.
//
// The pipeline flows in this order:
//
//   train/test/predict .csv
//       │
//       ▼
//   CsvLoader         → reads rows into StsRecords
//       │
//       ▼
//   Splitter          → train/validation index assignment
//       │                (fit stage only; stratified or k-fold)
//       ▼
//   TextNormalizer    → canonicalizes punctuation/emoticon runs
//       │
//       ▼
//   PairEncoder       → sentence pair → fixed-length token ids
//       │                (optionally both directions: "swap")
//       ▼
//   StsDataset        → implements Burn's Dataset trait
//       │
//       ▼
//   StsBatcher        → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Ordering matters in one place: swap augmentation runs AFTER
// splitting, inside each partition, so the two directions of a
// pair can never land on opposite sides of the train/validation
// boundary.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads CSV tables into StsRecords
pub mod loader;

/// Canonicalizes repeated punctuation and emoticon runs
pub mod normalizer;

/// Encodes sentence pairs into fixed-length token sequences
pub mod encoder;

/// Implements Burn's Dataset trait for encoded samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Stratified holdout and k-fold split strategies
pub mod splitter;
