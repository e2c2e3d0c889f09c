//! Runtime configuration and candidate-directory file resolution

use crate::error::{Result, WeldError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Default decision threshold when the config file omits one
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Runtime configuration, loaded once at process start
///
/// Keys follow the camelCase layout of the deployed config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
    /// Path (or bare filename, resolved via [`SearchPaths`]) of the ONNX model
    pub model_path: PathBuf,

    /// Feature-mapping artifact describing the schema
    pub feature_mapping_path: PathBuf,

    /// Probability threshold for the Bad class
    #[serde(default = "default_threshold")]
    pub prediction_threshold: f64,

    /// Raw source table, used to regenerate the preprocessed artifact
    #[serde(default)]
    pub raw_data_path: Option<PathBuf>,

    /// Tabular artifact holding rows already mapped into schema order
    #[serde(default)]
    pub preprocessed_data_path: Option<PathBuf>,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl RuntimeConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            WeldError::ConfigError(format!("cannot open config {}: {e}", path.display()))
        })?;
        let config: RuntimeConfig = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| WeldError::ConfigError(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.prediction_threshold.is_finite() {
            return Err(WeldError::ConfigError(format!(
                "predictionThreshold must be finite, got {}",
                self.prediction_threshold
            )));
        }
        if self.model_path.as_os_str().is_empty() {
            return Err(WeldError::ConfigError("modelPath is empty".into()));
        }
        if self.feature_mapping_path.as_os_str().is_empty() {
            return Err(WeldError::ConfigError("featureMappingPath is empty".into()));
        }
        Ok(())
    }

    /// Builder method to override the threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.prediction_threshold = threshold;
        self
    }
}

/// Explicit candidate-directory list for resolving logical filenames
///
/// Constructed once at startup and passed down; there is no implicit global
/// search order.
#[derive(Debug, Clone, Default)]
pub struct SearchPaths {
    dirs: Vec<PathBuf>,
}

impl SearchPaths {
    /// Search the given directories, in order. The working directory is
    /// always tried first.
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        let mut all = vec![PathBuf::from(".")];
        all.extend(dirs);
        Self { dirs: all }
    }

    /// First existing match for `name`, or the path itself when it already
    /// points at an existing file
    pub fn resolve(&self, name: &Path) -> Option<PathBuf> {
        if name.exists() {
            return Some(name.to_path_buf());
        }
        self.dirs
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.exists())
    }

    /// Like [`resolve`](Self::resolve) but fails with `MissingFile` naming
    /// every searched directory
    pub fn resolve_required(&self, name: &Path) -> Result<PathBuf> {
        self.resolve(name).ok_or_else(|| WeldError::MissingFile {
            name: name.display().to_string(),
            searched: self.dirs.clone(),
        })
    }
}
