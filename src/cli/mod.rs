// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with clap.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `prepare`     — runs one preparation stage end to end
//                      and reports partition sizes and the
//                      extended vocabulary size
//   2. `postprocess` — turns a raw predictions CSV into the
//                      three submission tables
//
// Reference: Rust Book §12 (CLI programs)

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PostprocessArgs, PrepareArgs};

/// The main CLI struct; clap generates the argument parsing
/// from the derive.
#[derive(Parser, Debug)]
#[command(
    name = "sts-pair-pipeline",
    version = "0.1.0",
    about = "Prepare paired-sentence STS data: normalize, tokenize, split, batch."
)]
pub struct Cli {
    /// The subcommand to run (prepare or postprocess)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch. The CLI layer only
    /// routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Prepare(args)     => Self::run_prepare(args),
            Commands::Postprocess(args) => Self::run_postprocess(args),
        }
    }

    /// Handles the `prepare` subcommand.
    fn run_prepare(args: PrepareArgs) -> Result<()> {
        use crate::application::data_module::{StsDataModule, Stage};

        let stage: Stage = args.stage.into();
        let save_config = args.save_config.clone();
        let config = args.into_config();

        tracing::info!("Preparing {:?} stage for '{}'", stage, config.model_name);

        let mut module = StsDataModule::new(config)?;
        module.setup(stage)?;

        println!("extended vocab size : {}", module.extended_vocab_size());
        if let Some(dataset) = module.train_dataset() {
            println!("train data len      : {}", dataset.sample_count());
        }
        if let Some(dataset) = module.val_dataset() {
            println!("valid data len      : {}", dataset.sample_count());
        }
        if let Some(dataset) = module.test_dataset() {
            println!("test data len       : {}", dataset.sample_count());
        }
        if let Some(dataset) = module.predict_dataset() {
            println!("predict data len    : {}", dataset.sample_count());
        }

        if let Some(path) = save_config {
            module.config().to_file(path)?;
        }
        Ok(())
    }

    /// Handles the `postprocess` subcommand.
    fn run_postprocess(args: PostprocessArgs) -> Result<()> {
        use crate::infra::submission::{read_predictions, SubmissionWriter};

        let (ids, raw) = read_predictions(&args.predictions)?;
        let writer = SubmissionWriter::new(&args.out_dir, args.target_range);
        let paths = writer.write_all(&ids, &raw)?;

        println!("wrote {}", paths.raw.display());
        println!("wrote {}", paths.normalized.display());
        println!("wrote {}", paths.ensembled.display());
        Ok(())
    }
}
