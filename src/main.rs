//! weldcheck - main entry point

use clap::Parser;
use weldcheck::cli::{cmd_batch, cmd_predict, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weldcheck=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Predict { row } => cmd_predict(&cli, *row)?,
        Commands::Batch { output } => cmd_batch(&cli, output.as_deref())?,
    }

    Ok(())
}
