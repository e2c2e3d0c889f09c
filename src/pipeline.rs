//! Per-request prediction pipeline
//!
//! assemble -> invoke -> resolve -> decide, synchronous and free of shared
//! mutable state: the schema is read-only and shared, everything else is
//! request-scoped.

use crate::assembler::{assemble, FeatureVector};
use crate::dataset::PreparedDataset;
use crate::decision::{decide, Decision};
use crate::error::{Result, WeldError};
use crate::invoker::ModelInvoker;
use crate::record::RawRecord;
use crate::resolver::resolve;
use crate::schema::FeatureSchema;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Rows between batch progress markers
const PROGRESS_INTERVAL: usize = 100;

/// Outcome of one batch row: a decision or the error that failed it
#[derive(Debug)]
pub struct RowOutcome {
    pub row: usize,
    pub result: Result<Decision>,
}

/// Serializable per-row report for external callers
#[derive(Debug, Serialize)]
pub struct RowReport {
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<Decision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RowOutcome {
    pub fn report(&self) -> RowReport {
        match &self.result {
            Ok(decision) => RowReport {
                row: self.row,
                decision: Some(*decision),
                error: None,
            },
            Err(e) => RowReport {
                row: self.row,
                decision: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// The prediction pipeline, generic over the inference backend
pub struct Predictor<I: ModelInvoker> {
    schema: Arc<FeatureSchema>,
    invoker: I,
    threshold: f64,
    dataset: Option<PreparedDataset>,
}

impl<I: ModelInvoker> Predictor<I> {
    pub fn new(schema: Arc<FeatureSchema>, invoker: I, threshold: f64) -> Self {
        Self {
            schema,
            invoker,
            threshold,
            dataset: None,
        }
    }

    /// Attach a prepared dataset for row-indexed and batch prediction
    pub fn with_dataset(mut self, dataset: PreparedDataset) -> Self {
        self.dataset = Some(dataset);
        self
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Predict from a raw record: full assemble path
    pub fn predict_record(&self, record: &RawRecord) -> Result<Decision> {
        let vector = assemble(record, &self.schema)?;
        self.predict_vector(&vector)
    }

    /// Predict one row of the prepared dataset
    pub fn predict_row(&self, row: usize) -> Result<Decision> {
        let dataset = self.dataset.as_ref().ok_or_else(|| {
            WeldError::ConfigError("no prepared dataset attached to predictor".into())
        })?;
        let vector = dataset.row_vector(row)?;
        self.predict_vector(&vector)
    }

    /// Predict every prepared row, one outcome per row
    ///
    /// Per-row failures are captured in the outcome so the batch completes
    /// for all well-formed rows.
    pub fn predict_all(&self) -> Result<Vec<RowOutcome>> {
        let dataset = self.dataset.as_ref().ok_or_else(|| {
            WeldError::ConfigError("no prepared dataset attached to predictor".into())
        })?;

        let n_rows = dataset.len();
        let mut outcomes = Vec::with_capacity(n_rows);
        for row in 0..n_rows {
            let result = dataset
                .row_vector(row)
                .and_then(|vector| self.predict_vector(&vector));
            outcomes.push(RowOutcome { row, result });

            if (row + 1) % PROGRESS_INTERVAL == 0 {
                info!(done = row + 1, total = n_rows, "batch progress");
            }
        }
        Ok(outcomes)
    }

    /// invoke -> resolve -> decide for an already-assembled vector
    pub fn predict_vector(&self, vector: &FeatureVector) -> Result<Decision> {
        let bundle = self.invoker.invoke(vector)?;
        let decoded = resolve(&bundle)?;
        debug!(
            raw_label = decoded.label,
            confidence = decoded.confidence,
            shape = ?decoded.source_shape,
            "decoded prediction"
        );
        // The thresholded confidence supersedes the backend's raw label.
        Ok(decide(decoded.confidence, self.threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::Label;
    use crate::outputs::{OutputBundle, OutputValue};
    use crate::record::RawValue;
    use crate::schema::{FeatureSlot, SlotKind};
    use std::collections::HashMap;

    struct StubInvoker {
        bundle: OutputBundle,
    }

    impl ModelInvoker for StubInvoker {
        fn invoke(&self, _features: &FeatureVector) -> Result<OutputBundle> {
            Ok(self.bundle.clone())
        }
    }

    fn schema() -> Arc<FeatureSchema> {
        Arc::new(
            FeatureSchema::new(vec![FeatureSlot {
                name: "MaxVal".into(),
                kind: SlotKind::Direct,
            }])
            .unwrap(),
        )
    }

    #[test]
    fn test_decision_overrides_backend_label() {
        // Backend says class 0, probabilities say Bad with 0.87.
        let bundle = OutputBundle::new()
            .with("output_label", OutputValue::Int64s(vec![0]))
            .with(
                "output_probability",
                OutputValue::ScoreMap(HashMap::from([(1_i64, 0.87_f32)])),
            );
        let predictor = Predictor::new(schema(), StubInvoker { bundle }, 0.5);

        let record = RawRecord::from_pairs([("MaxVal", RawValue::Float(1.0))]);
        let decision = predictor.predict_record(&record).unwrap();
        assert_eq!(decision.label, Label::Bad);
        assert!((decision.confidence - 0.87).abs() < 1e-6);
    }

    #[test]
    fn test_missing_label_fails_single_prediction() {
        let bundle =
            OutputBundle::new().with("output_probability", OutputValue::Floats(vec![0.5, 0.5]));
        let predictor = Predictor::new(schema(), StubInvoker { bundle }, 0.5);

        let record = RawRecord::from_pairs([("MaxVal", RawValue::Float(1.0))]);
        let err = predictor.predict_record(&record).unwrap_err();
        assert!(matches!(err, WeldError::MissingOutput(_)));
    }

    #[test]
    fn test_predict_row_without_dataset() {
        let bundle = OutputBundle::new().with("output_label", OutputValue::Int64s(vec![0]));
        let predictor = Predictor::new(schema(), StubInvoker { bundle }, 0.5);
        assert!(predictor.predict_row(0).is_err());
    }
}
