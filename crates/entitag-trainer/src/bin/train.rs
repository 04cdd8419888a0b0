//! Trains a fresh tagger on one exported training-record file and persists
//! the model artifact.

use std::path::PathBuf;

use clap::Parser;
use entitag_trainer::trainer::{train, TrainConfig};

#[derive(Parser)]
#[command(name = "train")]
#[command(about = "Train a NER model on an exported training-record file")]
#[command(version)]
struct Cli {
    /// Exported training-record JSON file
    #[arg(short, long)]
    input: PathBuf,

    /// Model artifact directory (overwritten in place)
    #[arg(short, long, default_value = "./custom_ner_model")]
    output: PathBuf,

    /// Number of passes over the data
    #[arg(short, long, default_value_t = 30)]
    epochs: usize,

    /// Train on a uniform random subset of this size
    #[arg(short, long)]
    sample_size: Option<usize>,

    /// RNG seed for sampling, shuffling and dropout
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = TrainConfig {
        input: cli.input,
        output_dir: cli.output,
        epochs: cli.epochs,
        sample_size: cli.sample_size,
        seed: cli.seed,
    };

    if let Err(e) = train(&config) {
        eprintln!("Training failed: {e:#}");
        std::process::exit(1);
    }
}
