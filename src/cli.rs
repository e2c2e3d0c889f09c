//! Command-line interface for single-row and batch prediction

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

use crate::config::{RuntimeConfig, SearchPaths};
use crate::dataset::PreparedDataset;
use crate::error::Result;
use crate::invoker::OnnxInvoker;
use crate::pipeline::Predictor;
use crate::schema::FeatureSchema;

/// Preprocessed artifact name used when the config does not name one
const DEFAULT_PREPROCESSED: &str = "preprocessed_data.csv";

#[derive(Parser)]
#[command(name = "weldcheck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Threshold-based weld classification over an ONNX model")]
pub struct Cli {
    /// Runtime configuration file (JSON)
    #[arg(short, long, default_value = "appsettings.json")]
    pub config: PathBuf,

    /// Extra directories to search for the model, mapping, and data files
    #[arg(long = "search-dir")]
    pub search_dirs: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Predict a single row of the prepared dataset
    Predict {
        /// Zero-based row index
        #[arg(short, long)]
        row: usize,
    },

    /// Predict every prepared row
    Batch {
        /// Optional file for the per-row JSON reports
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Load config, schema, model, and dataset, and wire up the predictor
pub fn build_predictor(cli: &Cli) -> Result<Predictor<OnnxInvoker>> {
    let paths = SearchPaths::new(cli.search_dirs.clone());

    let config_path = paths.resolve_required(&cli.config)?;
    let config = RuntimeConfig::load(&config_path)?;

    let mapping_path = paths.resolve_required(&config.feature_mapping_path)?;
    let schema = Arc::new(FeatureSchema::load(&mapping_path)?);

    let model_path = paths.resolve_required(&config.model_path)?;
    let invoker = OnnxInvoker::load(&model_path)?;

    let preprocessed = config
        .preprocessed_data_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PREPROCESSED));
    // The artifact may not exist yet; resolve the raw source through the
    // search paths but let the artifact path stand as-is for regeneration.
    let preprocessed = paths.resolve(&preprocessed).unwrap_or(preprocessed);
    let raw = match &config.raw_data_path {
        Some(name) => Some(paths.resolve_required(name)?),
        None => None,
    };
    let dataset = PreparedDataset::prepare(raw.as_deref(), &preprocessed, &schema)?;

    Ok(Predictor::new(schema, invoker, config.prediction_threshold).with_dataset(dataset))
}

pub fn cmd_predict(cli: &Cli, row: usize) -> Result<()> {
    let predictor = build_predictor(cli)?;
    let decision = predictor.predict_row(row)?;
    println!("{}", serde_json::to_string(&decision)?);
    Ok(())
}

pub fn cmd_batch(cli: &Cli, output: Option<&std::path::Path>) -> Result<()> {
    let predictor = build_predictor(cli)?;
    let outcomes = predictor.predict_all()?;

    let reports: Vec<_> = outcomes.iter().map(|o| o.report()).collect();
    let failed = reports.iter().filter(|r| r.error.is_some()).count();
    if failed > 0 {
        warn!(failed, total = reports.len(), "some rows failed to predict");
    }

    match output {
        Some(path) => {
            std::fs::write(path, serde_json::to_string_pretty(&reports)?)?;
            println!("wrote {} reports to {}", reports.len(), path.display());
        }
        None => {
            for report in &reports {
                println!("{}", serde_json::to_string(report)?);
            }
        }
    }
    Ok(())
}
