// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Three subcommands: `train`, `predict`, and `symptoms`.
// clap's derive macros generate help text, error messages for
// missing args, and type conversion.

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the disease classifier on a labeled symptom CSV
    Train(TrainArgs),

    /// Predict the top diseases for a set of symptoms
    Predict(PredictArgs),

    /// List the symptom vocabulary of the trained model
    Symptoms(SymptomsArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// CSV file with binary symptom columns and a trailing disease label
    #[arg(long, default_value = "data/Training.csv")]
    pub data_csv: String,

    /// Directory to write the model artifact, run config, and metrics
    #[arg(long, default_value = "artifacts")]
    pub artifact_dir: String,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 300)]
    pub epochs: usize,

    /// Number of samples processed together in one forward pass
    #[arg(long, default_value_t = 8)]
    pub batch_size: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Fraction of samples held out for validation
    #[arg(long, default_value_t = 0.2)]
    pub val_fraction: f64,

    /// Print a progress report every this many epochs
    #[arg(long, default_value_t = 20)]
    pub log_every: usize,

    /// Shuffle seed, fixed so a run is reproducible
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_csv: a.data_csv,
            artifact_dir: a.artifact_dir,
            epochs: a.epochs,
            batch_size: a.batch_size,
            lr: a.lr,
            val_fraction: a.val_fraction,
            log_every: a.log_every,
            seed: a.seed,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Comma-separated symptom names, e.g. --symptoms itching,skin_rash
    #[arg(long, value_delimiter = ',', required = true)]
    pub symptoms: Vec<String>,

    /// Directory where the trained artifact was saved
    #[arg(long, default_value = "artifacts")]
    pub artifact_dir: String,
}

/// All arguments for the `symptoms` command
#[derive(Args, Debug)]
pub struct SymptomsArgs {
    /// Directory where the trained artifact was saved
    #[arg(long, default_value = "artifacts")]
    pub artifact_dir: String,
}
