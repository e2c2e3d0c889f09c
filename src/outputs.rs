//! Raw result bundles returned by the inference backend
//!
//! The backend is free to encode each named output however its export
//! pipeline happened to serialize it. The bundle keeps outputs in backend
//! order and makes no promises beyond "named values of one of these shapes";
//! interpretation belongs to the resolver.

use std::collections::HashMap;

/// Physical shape of a single backend output
#[derive(Debug, Clone, PartialEq)]
pub enum OutputValue {
    /// Rank-1 i64 tensor (class labels)
    Int64s(Vec<i64>),
    /// Rank-1 f32 tensor (per-class scores, flattened)
    Floats(Vec<f32>),
    /// Sequence of per-class score maps, one map per input row
    ScoreMaps(Vec<HashMap<i64, f32>>),
    /// A single per-class score map
    ScoreMap(HashMap<i64, f32>),
    /// Shape the backend adapter could not convert; carries a description
    /// for diagnostics. Resolution degrades on this, it never fails.
    Unsupported(String),
}

/// Ordered collection of named backend outputs, consumed once per prediction
#[derive(Debug, Clone, Default)]
pub struct OutputBundle {
    outputs: Vec<(String, OutputValue)>,
}

impl OutputBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: OutputValue) {
        self.outputs.push((name.into(), value));
    }

    pub fn with(mut self, name: impl Into<String>, value: OutputValue) -> Self {
        self.push(name, value);
        self
    }

    /// First output whose name matches any of the given candidates, in
    /// candidate order
    pub fn find(&self, candidates: &[&str]) -> Option<&OutputValue> {
        candidates
            .iter()
            .find_map(|wanted| self.get(wanted))
    }

    pub fn get(&self, name: &str) -> Option<&OutputValue> {
        self.outputs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.outputs.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_honors_candidate_order() {
        let bundle = OutputBundle::new()
            .with("probabilities", OutputValue::Floats(vec![0.1]))
            .with("output_probability", OutputValue::Floats(vec![0.9]));

        let found = bundle.find(&["output_probability", "probabilities"]);
        assert_eq!(found, Some(&OutputValue::Floats(vec![0.9])));
    }

    #[test]
    fn test_find_absent() {
        let bundle = OutputBundle::new().with("output_label", OutputValue::Int64s(vec![1]));
        assert!(bundle.find(&["output_probability"]).is_none());
    }
}
