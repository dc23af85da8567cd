// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the `prepare` and `postprocess` subcommands and all
// their configurable flags. clap's derive macros generate help
// text, missing-argument errors, and type conversion.

use clap::{Args, Subcommand, ValueEnum};

use crate::application::data_module::{PipelineConfig, SplitMode, Stage};

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one data-preparation stage end to end
    Prepare(PrepareArgs),

    /// Turn a raw predictions CSV into submission tables
    Postprocess(PostprocessArgs),
}

/// Which preparation stage to run
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum StageArg {
    Fit,
    Test,
    Predict,
}

impl From<StageArg> for Stage {
    fn from(stage: StageArg) -> Self {
        match stage {
            StageArg::Fit     => Stage::Fit,
            StageArg::Test    => Stage::Test,
            StageArg::Predict => Stage::Predict,
        }
    }
}

/// All arguments for the `prepare` command.
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Pretrained checkpoint identifier (resolves the tokenizer family)
    #[arg(long, default_value = "klue/roberta-small")]
    pub model_name: String,

    /// Path to the checkpoint's tokenizer.json
    #[arg(long, default_value = "checkpoints/tokenizer.json")]
    pub tokenizer_file: String,

    /// Training table (id, sentence_1, sentence_2, label, binary-label)
    #[arg(long, default_value = "data/train.csv")]
    pub train_path: String,

    /// Evaluation table with labels
    #[arg(long, default_value = "data/dev.csv")]
    pub test_path: String,

    /// Prediction table, labels optional
    #[arg(long, default_value = "data/test.csv")]
    pub predict_path: String,

    /// Samples per batch handed to the trainer
    #[arg(long, default_value_t = 16)]
    pub batch_size: usize,

    /// Fixed token-sequence length (padded / truncated)
    #[arg(long, default_value_t = 128)]
    pub max_seq_len: usize,

    /// Training share of the stratified holdout split
    #[arg(long, default_value_t = 0.8)]
    pub train_ratio: f64,

    /// Switch to k-fold mode with this many folds
    #[arg(long)]
    pub num_folds: Option<usize>,

    /// Which fold to hold out as validation (k-fold mode)
    #[arg(long, default_value_t = 0)]
    pub fold_index: usize,

    /// Encode both sentence orders in training partitions
    #[arg(long)]
    pub swap: bool,

    /// Keep the training loader in table order
    #[arg(long)]
    pub no_shuffle: bool,

    /// Seed for split strategies and loader shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Which stage to prepare
    #[arg(long, value_enum, default_value_t = StageArg::Fit)]
    pub stage: StageArg,

    /// Save the resolved pipeline config as JSON
    #[arg(long)]
    pub save_config: Option<String>,
}

impl PrepareArgs {
    /// Convert CLI args into the application-layer config.
    /// This is the boundary between Layer 1 and Layer 2; the
    /// application layer never sees clap types.
    pub fn into_config(self) -> PipelineConfig {
        let split = match self.num_folds {
            Some(num_folds) => SplitMode::KFold { num_folds, fold_index: self.fold_index },
            None => SplitMode::Holdout { train_ratio: self.train_ratio },
        };
        PipelineConfig {
            model_name:     self.model_name,
            tokenizer_file: self.tokenizer_file,
            train_path:     self.train_path,
            test_path:      self.test_path,
            predict_path:   self.predict_path,
            batch_size:     self.batch_size,
            max_seq_len:    self.max_seq_len,
            split,
            swap:           self.swap,
            shuffle:        !self.no_shuffle,
            seed:           self.seed,
            added_tokens:   PipelineConfig::default_added_tokens(),
        }
    }
}

/// All arguments for the `postprocess` command
#[derive(Args, Debug)]
pub struct PostprocessArgs {
    /// Predictions CSV with columns id,target
    #[arg(long)]
    pub predictions: String,

    /// Directory for the three submission tables
    #[arg(long, default_value = "submissions")]
    pub out_dir: String,

    /// Numeric range the normalized column is rescaled to
    #[arg(long, default_value_t = 5.0)]
    pub target_range: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> PrepareArgs {
        PrepareArgs {
            model_name:     "klue/roberta-small".to_string(),
            tokenizer_file: "tok.json".to_string(),
            train_path:     "train.csv".to_string(),
            test_path:      "dev.csv".to_string(),
            predict_path:   "test.csv".to_string(),
            batch_size:     16,
            max_seq_len:    128,
            train_ratio:    0.8,
            num_folds:      None,
            fold_index:     0,
            swap:           false,
            no_shuffle:     false,
            seed:           42,
            stage:          StageArg::Fit,
            save_config:    None,
        }
    }

    #[test]
    fn test_holdout_is_the_default_split_mode() {
        let config = base_args().into_config();
        assert!(matches!(config.split, SplitMode::Holdout { train_ratio } if train_ratio == 0.8));
        assert!(config.shuffle);
    }

    #[test]
    fn test_num_folds_switches_to_kfold() {
        let mut args = base_args();
        args.num_folds = Some(5);
        args.fold_index = 3;
        let config = args.into_config();
        assert!(matches!(
            config.split,
            SplitMode::KFold { num_folds: 5, fold_index: 3 }
        ));
    }
}
