// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, built on `clap`.
// All business logic is delegated to Layer 2 (application).
//
// Three commands are supported:
//   1. `train`    — trains the classifier from a symptom CSV
//   2. `predict`  — loads the artifact and prints ranked diseases
//   3. `symptoms` — prints the trained symptom vocabulary

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PredictArgs, SymptomsArgs, TrainArgs};

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "disease-predictor",
    version = "0.1.0",
    about = "Train a feedforward disease classifier on symptom CSV data, then predict from symptoms."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This keeps the CLI layer thin — it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => Self::run_train(args),
            Commands::Predict(args) => Self::run_predict(args),
            Commands::Symptoms(args) => Self::run_symptoms(args),
        }
    }

    /// Handles the `train` subcommand.
    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting training on '{}'", args.data_csv);

        let use_case = TrainUseCase::new(args.into());
        use_case.execute()?;

        println!("Training complete. Artifact saved.");
        Ok(())
    }

    /// Handles the `predict` subcommand.
    fn run_predict(args: PredictArgs) -> Result<()> {
        use crate::application::predict_use_case::PredictUseCase;

        let use_case = PredictUseCase::new(&args.artifact_dir);
        let report = use_case.predict(&args.symptoms)?;

        println!("\nTop {} Predictions:", report.predictions.len());
        for (idx, p) in report.predictions.iter().enumerate() {
            println!("  {}. {}: {:.2}%", idx + 1, p.disease, p.confidence * 100.0);
        }
        if !report.ignored_symptoms.is_empty() {
            println!(
                "\nIgnored symptoms not in the trained vocabulary: {}",
                report.ignored_symptoms.join(", "),
            );
        }
        Ok(())
    }

    /// Handles the `symptoms` subcommand.
    fn run_symptoms(args: SymptomsArgs) -> Result<()> {
        use crate::application::predict_use_case::PredictUseCase;

        let use_case = PredictUseCase::new(&args.artifact_dir);
        let names = use_case.available_symptoms()?;

        println!("{} symptoms in the trained vocabulary:", names.len());
        for name in names {
            println!("  {name}");
        }
        Ok(())
    }
}
