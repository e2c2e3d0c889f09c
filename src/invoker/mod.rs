//! Inference invoker abstraction
//!
//! The numeric backend is an opaque external service: it takes a feature
//! vector and hands back a bundle of named outputs in whatever shapes its
//! export pipeline produced. The pipeline only depends on this trait; the
//! live ONNX Runtime adapter lives behind the `onnx` feature.

use crate::assembler::FeatureVector;
use crate::error::Result;
use crate::outputs::OutputBundle;

#[cfg(feature = "onnx")]
mod onnx;
#[cfg(feature = "onnx")]
pub use onnx::OnnxInvoker;

/// A blocking handle to the inference backend
///
/// Thread safety of the underlying backend is part of this contract: one
/// handle may be shared across concurrently running pipelines.
pub trait ModelInvoker: Send + Sync {
    /// Run one feature vector through the model
    fn invoke(&self, features: &FeatureVector) -> Result<OutputBundle>;
}
