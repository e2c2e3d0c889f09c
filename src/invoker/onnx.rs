//! ONNX Runtime invoker
//!
//! Feeds the feature vector to the session's single float input and converts
//! every session output into the bundle's shape vocabulary. Conversion is
//! best-effort: an output shape the adapter cannot map becomes
//! `OutputValue::Unsupported`, which the resolver degrades on instead of
//! failing.

use crate::assembler::FeatureVector;
use crate::error::{Result, WeldError};
use crate::invoker::ModelInvoker;
use crate::outputs::{OutputBundle, OutputValue};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::{Session, SessionInputs};
use ort::value::{DynMapValueType, DynValue, Tensor};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

/// Invoker backed by an in-process ONNX Runtime session
pub struct OnnxInvoker {
    // Session::run takes &mut self; the mutex makes one handle shareable
    // across pipelines, serializing calls.
    session: Mutex<Session>,
    input_name: String,
}

impl OnnxInvoker {
    /// Load a model and bind its first input
    pub fn load(model_path: &Path) -> Result<Self> {
        let session = Session::builder()
            .and_then(|builder| builder.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|builder| builder.commit_from_file(model_path))
            .map_err(|e| {
                WeldError::InferenceError(format!(
                    "cannot load model {}: {e}",
                    model_path.display()
                ))
            })?;

        let input_name = session
            .inputs()
            .first()
            .map(|input| input.name().to_string())
            .ok_or_else(|| {
                WeldError::InferenceError(format!(
                    "model {} declares no inputs",
                    model_path.display()
                ))
            })?;

        debug!(model = %model_path.display(), input = %input_name, "ONNX session ready");

        Ok(Self {
            session: Mutex::new(session),
            input_name,
        })
    }
}

impl ModelInvoker for OnnxInvoker {
    fn invoke(&self, features: &FeatureVector) -> Result<OutputBundle> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| WeldError::InferenceError("session lock poisoned".into()))?;

        let tensor = Tensor::from_array(([1usize, features.len()], features.as_slice().to_vec()))
            .map_err(|e| WeldError::InferenceError(format!("input tensor: {e}")))?;

        let inputs = ort::inputs![self.input_name.as_str() => tensor];
        let outputs = session
            .run(SessionInputs::ValueMap(inputs))
            .map_err(|e| WeldError::InferenceError(format!("forward pass: {e}")))?;

        let mut bundle = OutputBundle::new();
        for (name, value) in outputs.iter() {
            bundle.push(name, convert_output(&value));
        }
        Ok(bundle)
    }
}

/// Map a session output onto the bundle's shape vocabulary
fn convert_output(value: &DynValue) -> OutputValue {
    if let Ok((_, data)) = value.try_extract_tensor::<i64>() {
        return OutputValue::Int64s(data.to_vec());
    }
    if let Ok((_, data)) = value.try_extract_tensor::<f32>() {
        return OutputValue::Floats(data.to_vec());
    }
    if let Ok(map) = value.try_extract_map::<i64, f32>() {
        return OutputValue::ScoreMap(map);
    }
    if let Ok(maps) = extract_score_maps(value) {
        return OutputValue::ScoreMaps(maps);
    }
    OutputValue::Unsupported(format!("{:?}", value.dtype()))
}

/// Extract a sequence-of-maps output (e.g. a ZipMap'd probability column)
fn extract_score_maps(value: &DynValue) -> ort::Result<Vec<HashMap<i64, f32>>> {
    let elements = value.try_extract_sequence::<DynMapValueType>()?;
    let mut maps = Vec::with_capacity(elements.len());
    for element in elements {
        maps.push(element.try_extract_map::<i64, f32>()?);
    }
    Ok(maps)
}
