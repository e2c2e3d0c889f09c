//! Output resolution: raw result bundle -> canonical (label, confidence)
//!
//! The backend gives no advance warning of which physical encoding its
//! probability output uses; exporters differ even between versions of the
//! same toolchain. Resolution classifies the shape explicitly and extracts a
//! confidence for the positive (Bad) class from whichever form showed up.
//! Everything except a missing label output degrades instead of failing.

use crate::error::{Result, WeldError};
use crate::outputs::{OutputBundle, OutputValue};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Output names the label tensor is published under
pub const LABEL_OUTPUT_NAMES: &[&str] = &["output_label", "label"];

/// Output names the probability output is published under
pub const PROBABILITY_OUTPUT_NAMES: &[&str] = &["output_probability", "probabilities"];

/// Neutral confidence used whenever no probability can be extracted
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Physical encoding the probability output was found in
///
/// Diagnostic only; correctness never depends on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceShape {
    /// Ordered per-class float scores
    FlatVector,
    /// Single class-id -> score map
    ScoreMap,
    /// Outer sequence whose first element is a score map
    SequenceOfScoreMaps,
    /// Shape matched none of the known encodings
    Unrecognized,
    /// No probability output was published at all
    Absent,
}

/// Canonical decoded prediction, independent of the backend's encoding
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedResult {
    /// Raw class id from the backend's label tensor. Informational only;
    /// the decision policy recomputes the final label from the confidence.
    pub label: i64,
    /// Probability of the positive (Bad) class, in [0, 1]
    pub confidence: f64,
    /// Where the confidence came from
    pub source_shape: SourceShape,
}

/// Resolve a raw result bundle into a decoded result
///
/// A missing label output is the only fatal condition, and it is fatal for
/// this prediction only. A missing or unreadable probability output resolves
/// to [`DEFAULT_CONFIDENCE`].
pub fn resolve(bundle: &OutputBundle) -> Result<DecodedResult> {
    let label = match bundle.find(LABEL_OUTPUT_NAMES) {
        Some(OutputValue::Int64s(values)) => values.first().copied().unwrap_or(0),
        Some(other) => {
            // Label published under the right name but in an unexpected shape.
            // Keep the diagnostic fallback at 0 rather than failing.
            warn!(shape = ?shape_of(other), "label output has unexpected shape");
            0
        }
        None => {
            // Name every alias that was tried, so the message points at the
            // actual lookup rather than a single candidate.
            return Err(WeldError::MissingOutput(LABEL_OUTPUT_NAMES.join(", ")));
        }
    };

    let (confidence, source_shape) = match bundle.find(PROBABILITY_OUTPUT_NAMES) {
        None => (DEFAULT_CONFIDENCE, SourceShape::Absent),
        Some(value) => extract_confidence(value),
    };

    Ok(DecodedResult {
        label,
        confidence,
        source_shape,
    })
}

/// Classify a probability output and pull the positive-class confidence out
/// of it. Never fails; unknown shapes and empty containers fall back to the
/// default.
fn extract_confidence(value: &OutputValue) -> (f64, SourceShape) {
    match value {
        OutputValue::Floats(scores) => (flat_vector_confidence(scores), SourceShape::FlatVector),
        OutputValue::ScoreMap(map) => (score_map_confidence(map), SourceShape::ScoreMap),
        // Must be unwrapped to its first map, never iterated as if it were a
        // flat vector.
        OutputValue::ScoreMaps(maps) => match maps.first() {
            Some(map) => (score_map_confidence(map), SourceShape::SequenceOfScoreMaps),
            None => {
                warn!("probability output is an empty sequence, using default confidence");
                (DEFAULT_CONFIDENCE, SourceShape::SequenceOfScoreMaps)
            }
        },
        OutputValue::Int64s(_) | OutputValue::Unsupported(_) => {
            warn!(shape = ?shape_of(value), "unrecognized probability shape, using default confidence");
            (DEFAULT_CONFIDENCE, SourceShape::Unrecognized)
        }
    }
}

/// Flat per-class scores: index 1 is the positive (Bad) class when the
/// exporter kept both classes; a single score is already the positive one.
fn flat_vector_confidence(scores: &[f32]) -> f64 {
    match scores {
        [] => {
            warn!("probability output is an empty vector, using default confidence");
            DEFAULT_CONFIDENCE
        }
        [only] => *only as f64,
        [_, positive, ..] => *positive as f64,
    }
}

/// Score map keyed by class id; the complementary class is inferable as 1-p
fn score_map_confidence(map: &HashMap<i64, f32>) -> f64 {
    if let Some(&p) = map.get(&1) {
        p as f64
    } else if let Some(&p) = map.get(&0) {
        1.0 - p as f64
    } else {
        warn!("score map holds neither class 0 nor class 1, using default confidence");
        DEFAULT_CONFIDENCE
    }
}

fn shape_of(value: &OutputValue) -> &'static str {
    match value {
        OutputValue::Int64s(_) => "i64 tensor",
        OutputValue::Floats(_) => "f32 tensor",
        OutputValue::ScoreMaps(_) => "sequence of score maps",
        OutputValue::ScoreMap(_) => "score map",
        OutputValue::Unsupported(_) => "unsupported",
    }
}
