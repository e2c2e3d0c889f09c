//! weldcheck - inference glue for an ONNX weld-defect classifier
//!
//! Takes loosely-typed tabular records, assembles the fixed-order feature
//! vector the model was trained on, runs the opaque inference backend, and
//! normalizes its heterogeneously-shaped outputs into a thresholded
//! Good/Bad decision.
//!
//! # Modules
//!
//! ## Core pipeline
//! - [`schema`] - Ordered feature schema with explicit one-hot groups
//! - [`assembler`] - Raw record -> fixed-order feature vector
//! - [`invoker`] - Backend abstraction (ONNX Runtime adapter behind `onnx`)
//! - [`resolver`] - Raw result bundle -> canonical (label, confidence)
//! - [`decision`] - Threshold policy producing the final classification
//! - [`pipeline`] - Per-request orchestration and batch mode
//!
//! ## Data & glue
//! - [`record`] - Loosely typed raw records
//! - [`outputs`] - Result bundle shape vocabulary
//! - [`dataset`] - Preprocessed-row artifact, regenerated when absent
//! - [`config`] - Runtime configuration and candidate-directory search

pub mod error;

pub mod assembler;
pub mod config;
pub mod dataset;
pub mod decision;
pub mod invoker;
pub mod outputs;
pub mod pipeline;
pub mod record;
pub mod resolver;
pub mod schema;

#[cfg(feature = "onnx")]
pub mod cli;

pub use error::{Result, WeldError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::assembler::{assemble, FeatureVector};
    pub use crate::config::{RuntimeConfig, SearchPaths};
    pub use crate::dataset::PreparedDataset;
    pub use crate::decision::{decide, Decision, Label};
    pub use crate::error::{Result, WeldError};
    pub use crate::invoker::ModelInvoker;
    #[cfg(feature = "onnx")]
    pub use crate::invoker::OnnxInvoker;
    pub use crate::outputs::{OutputBundle, OutputValue};
    pub use crate::pipeline::{Predictor, RowOutcome, RowReport};
    pub use crate::record::{RawRecord, RawValue};
    pub use crate::resolver::{resolve, DecodedResult, SourceShape, DEFAULT_CONFIDENCE};
    pub use crate::schema::{FeatureSchema, FeatureSlot, SlotKind};
}
