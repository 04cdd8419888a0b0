//! Downloads a public NER dataset's training split and exports it as a
//! normalized training-record JSON file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use entitag_core::Dataset;
use entitag_trainer::export::{export, ExportConfig};
use entitag_trainer::hub::HubClient;

#[derive(Parser)]
#[command(name = "fetch-dataset")]
#[command(about = "Download and convert a public NER dataset")]
#[command(version)]
struct Cli {
    /// Dataset to fetch: conll2003, wnut17 or ontonotes5
    #[arg(short, long)]
    dataset: Dataset,

    /// Cap the number of fetched examples (smoke runs)
    #[arg(short, long)]
    limit: Option<usize>,

    /// Output path (defaults to the dataset's fixed filename)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = ExportConfig {
        dataset: cli.dataset,
        limit: cli.limit,
        output: cli.output,
    };

    let client = HubClient::new();
    let summary = export(&client, &config).await?;
    println!(
        "Exported {} of {} examples to {}",
        summary.kept,
        summary.fetched,
        summary.output.display()
    );
    Ok(())
}
