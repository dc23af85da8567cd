// ============================================================
// Layer 2 — StsDataModule
// ============================================================
// The per-stage orchestrator. For each stage it runs one
// blocking preprocessing pass:
//
//   fit:     load train table → split (stratified holdout OR
//            k-fold) → encode each partition with the swap
//            flag → train + validation datasets
//   test:    load test table → encode, swap forced off →
//            one dataset
//   predict: load predict table → encode, swap forced off →
//            one dataset; absent labels degrade to an
//            input-only dataset instead of failing
//
// Two ordering rules are load-bearing:
//   - The tokenizer's vocabulary extension is applied once, in
//     new(), before any encoding.
//   - Swap augmentation runs AFTER splitting, inside each
//     partition, so no augmented pair straddles the
//     train/validation boundary. This holds for both split
//     strategies.
//
// Any error aborts the whole setup() call for that stage; the
// datasets are only stored after the full pass succeeded, so a
// caller never observes a partial stage.

use std::sync::Arc;

use anyhow::{Context, Result};
use burn::data::dataloader::{DataLoader, DataLoaderBuilder};
use burn::prelude::Backend;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data::{
    batcher::{StsBatch, StsBatcher},
    dataset::StsDataset,
    encoder::PairEncoder,
    loader::CsvLoader,
    splitter::{KFoldSplit, StratifiedShuffleSplit},
};
use crate::domain::error::PipelineError;
use crate::domain::traits::{RecordSource, SplitStrategy};
use crate::infra::tokenizer::{TokenizerAdapter, TokenizerRegistry};

// ─── Stage ────────────────────────────────────────────────────────────────────

/// The three preparation stages. Fit produces two datasets,
/// the others one each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fit,
    Test,
    Predict,
}

// ─── Configuration ────────────────────────────────────────────────────────────

/// How the fit stage partitions the training table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SplitMode {
    /// Single stratified train/validation split at the ratio
    Holdout { train_ratio: f64 },
    /// Hold out one fold of num_folds as validation
    KFold { num_folds: usize, fold_index: usize },
}

/// Everything a preparation run needs. Serialisable so a run
/// can be reproduced from the saved JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Pretrained checkpoint identifier; resolves the tokenizer
    /// family through the registry
    pub model_name: String,

    /// Path to the checkpoint's tokenizer.json
    pub tokenizer_file: String,

    pub train_path:   String,
    pub test_path:    String,
    pub predict_path: String,

    pub batch_size:  usize,
    pub max_seq_len: usize,

    pub split: SplitMode,

    /// Bidirectional pair augmentation (training partitions only)
    pub swap: bool,

    /// Shuffle the training loader (validation/test/predict
    /// iterate in stable order regardless)
    pub shuffle: bool,

    /// Explicit seed threaded through the split strategies and
    /// the training loader shuffle. No global RNG state.
    pub seed: u64,

    /// Custom tokens appended to the tokenizer vocabulary
    pub added_tokens: Vec<String>,
}

impl PipelineConfig {
    /// The custom tokens this project adds on top of every
    /// pretrained vocabulary: the anonymisation placeholder and
    /// the canonical repetition forms the normalizer produces.
    pub fn default_added_tokens() -> Vec<String> {
        ["<PERSON>", "...", "!!!", "???", "ㅎㅎㅎ", "ㅋㅋㅋ", "ㄷㄷㄷ"]
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("cannot write config to '{}'", path.display()))?;
        tracing::info!("Pipeline config saved to '{}'", path.display());
        Ok(())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config from '{}'", path.display()))?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model_name:     "klue/roberta-small".to_string(),
            tokenizer_file: "checkpoints/tokenizer.json".to_string(),
            train_path:     "data/train.csv".to_string(),
            test_path:      "data/dev.csv".to_string(),
            predict_path:   "data/test.csv".to_string(),
            batch_size:     16,
            max_seq_len:    128,
            split:          SplitMode::Holdout { train_ratio: 0.8 },
            swap:           false,
            shuffle:        true,
            seed:           42,
            added_tokens:   Self::default_added_tokens(),
        }
    }
}

// ─── StsDataModule ────────────────────────────────────────────────────────────

/// Owns the config, the tokenizer adapter, and the per-stage
/// datasets once setup() has run.
pub struct StsDataModule {
    config: PipelineConfig,
    tokenizer: TokenizerAdapter,

    train_dataset:   Option<StsDataset>,
    val_dataset:     Option<StsDataset>,
    test_dataset:    Option<StsDataset>,
    predict_dataset: Option<StsDataset>,
}

impl StsDataModule {
    /// Build the module with the default checkpoint registry
    pub fn new(config: PipelineConfig) -> Result<Self> {
        Self::with_registry(config, &TokenizerRegistry::with_known_checkpoints())
    }

    /// Build the module with an injected registry (tests and
    /// exotic checkpoints register their own entries)
    pub fn with_registry(config: PipelineConfig, registry: &TokenizerRegistry) -> Result<Self> {
        // Vocabulary extension happens exactly once, in here.
        // The adapter is immutable afterwards.
        let tokenizer = TokenizerAdapter::from_file(
            &config.tokenizer_file,
            &config.model_name,
            registry,
            config.max_seq_len,
            &config.added_tokens,
        )?;

        Ok(Self {
            config,
            tokenizer,
            train_dataset:   None,
            val_dataset:     None,
            test_dataset:    None,
            predict_dataset: None,
        })
    }

    /// The embedding-table size the model constructor must
    /// allocate before loading any saved weights.
    pub fn extended_vocab_size(&self) -> usize {
        self.tokenizer.extended_vocab_size()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the preprocessing pass for one stage.
    pub fn setup(&mut self, stage: Stage) -> Result<()> {
        match stage {
            Stage::Fit     => self.setup_fit(),
            Stage::Test    => self.setup_eval(Stage::Test),
            Stage::Predict => self.setup_eval(Stage::Predict),
        }
    }

    // ── Fit: split, then augment within each partition ───────────────────────
    fn setup_fit(&mut self) -> Result<()> {
        let records = CsvLoader::new(&self.config.train_path).load_all()?;

        // The training table must be fully labelled. Explicit
        // check up front; a half-labelled table is as broken as
        // an unlabelled one.
        if records.is_empty() || records.iter().any(|r| r.label.is_none()) {
            return Err(PipelineError::MissingTarget("label".to_string()).into());
        }

        let strategy: Box<dyn SplitStrategy> = match self.config.split {
            SplitMode::Holdout { train_ratio } => {
                Box::new(StratifiedShuffleSplit::new(train_ratio, self.config.seed))
            }
            SplitMode::KFold { num_folds, fold_index } => {
                Box::new(KFoldSplit::new(num_folds, fold_index, self.config.seed))
            }
        };
        let assignment = strategy.split(&records)?;

        // Swap augmentation strictly after splitting: each
        // partition is encoded on its own, so both directions of
        // a record stay on its side of the boundary.
        let encoder = PairEncoder::new(&self.tokenizer);
        let train_samples =
            encoder.encode_records(&records, &assignment.train, self.config.swap)?;
        let val_samples =
            encoder.encode_records(&records, &assignment.validation, self.config.swap)?;

        tracing::info!(
            "Fit datasets ready: {} train, {} validation sample(s) (swap {})",
            train_samples.len(),
            val_samples.len(),
            if self.config.swap { "on" } else { "off" },
        );

        self.train_dataset = Some(StsDataset::new(train_samples));
        self.val_dataset = Some(StsDataset::new(val_samples));
        Ok(())
    }

    // ── Test / Predict: no split, swap forced off ────────────────────────────
    fn setup_eval(&mut self, stage: Stage) -> Result<()> {
        let path = match stage {
            Stage::Test    => &self.config.test_path,
            Stage::Predict => &self.config.predict_path,
            Stage::Fit     => unreachable!("fit is handled by setup_fit"),
        };
        let records = CsvLoader::new(path).load_all()?;

        let indices: Vec<usize> = (0..records.len()).collect();
        let encoder = PairEncoder::new(&self.tokenizer);
        // Swap is a training-only augmentation
        let samples = encoder.encode_records(&records, &indices, false)?;

        let dataset = StsDataset::new(samples);
        if !dataset.has_targets() {
            tracing::info!(
                "Table '{}' carries no labels: prediction-style dataset (inputs only)",
                path,
            );
        }
        tracing::info!("{:?} dataset ready: {} sample(s)", stage, dataset.sample_count());

        match stage {
            Stage::Test    => self.test_dataset = Some(dataset),
            Stage::Predict => self.predict_dataset = Some(dataset),
            Stage::Fit     => unreachable!(),
        }
        Ok(())
    }

    // ── Dataset accessors ────────────────────────────────────────────────────
    pub fn train_dataset(&self) -> Option<&StsDataset> {
        self.train_dataset.as_ref()
    }

    pub fn val_dataset(&self) -> Option<&StsDataset> {
        self.val_dataset.as_ref()
    }

    pub fn test_dataset(&self) -> Option<&StsDataset> {
        self.test_dataset.as_ref()
    }

    pub fn predict_dataset(&self) -> Option<&StsDataset> {
        self.predict_dataset.as_ref()
    }

    // ── Data loaders (the trainer-facing batch contract) ─────────────────────

    /// Training loader: configured batch size, seeded shuffle
    /// when enabled.
    pub fn train_dataloader<B: Backend>(
        &self,
        device: &B::Device,
    ) -> Result<Arc<dyn DataLoader<StsBatch<B>>>> {
        let dataset = self
            .train_dataset
            .clone()
            .context("setup(Stage::Fit) must run before train_dataloader")?;
        let mut builder = DataLoaderBuilder::new(StsBatcher::<B>::new(device.clone()))
            .batch_size(self.config.batch_size)
            .num_workers(1);
        if self.config.shuffle {
            builder = builder.shuffle(self.config.seed);
        }
        Ok(builder.build(dataset))
    }

    /// Validation loader: stable order, never shuffled
    pub fn val_dataloader<B: Backend>(
        &self,
        device: &B::Device,
    ) -> Result<Arc<dyn DataLoader<StsBatch<B>>>> {
        let dataset = self
            .val_dataset
            .clone()
            .context("setup(Stage::Fit) must run before val_dataloader")?;
        Ok(self.stable_loader(dataset, device))
    }

    pub fn test_dataloader<B: Backend>(
        &self,
        device: &B::Device,
    ) -> Result<Arc<dyn DataLoader<StsBatch<B>>>> {
        let dataset = self
            .test_dataset
            .clone()
            .context("setup(Stage::Test) must run before test_dataloader")?;
        Ok(self.stable_loader(dataset, device))
    }

    pub fn predict_dataloader<B: Backend>(
        &self,
        device: &B::Device,
    ) -> Result<Arc<dyn DataLoader<StsBatch<B>>>> {
        let dataset = self
            .predict_dataset
            .clone()
            .context("setup(Stage::Predict) must run before predict_dataloader")?;
        Ok(self.stable_loader(dataset, device))
    }

    fn stable_loader<B: Backend>(
        &self,
        dataset: StsDataset,
        device: &B::Device,
    ) -> Arc<dyn DataLoader<StsBatch<B>>> {
        DataLoaderBuilder::new(StsBatcher::<B>::new(device.clone()))
            .batch_size(self.config.batch_size)
            .num_workers(1)
            .build(dataset)
    }
}
