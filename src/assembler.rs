//! Feature vector assembly
//!
//! Maps one raw record into the fixed-order numeric vector the model was
//! trained on. Pure: same record + schema always yields the same vector.

use crate::error::{Result, WeldError};
use crate::record::{RawRecord, RawValue};
use crate::schema::{FeatureSchema, SlotKind};
use ndarray::Array1;

/// Fixed-length ordered feature vector, created per request and consumed once
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Array1<f32>,
}

impl FeatureVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self {
            values: Array1::from_vec(values),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        self.values.as_slice().expect("feature vector is contiguous")
    }

    pub fn values(&self) -> &Array1<f32> {
        &self.values
    }
}

/// Assemble a feature vector from a raw record, in exact schema order
///
/// Direct slots require their column to be present (`SchemaMismatch`) and
/// numeric or float-parseable (`MalformedValue`). One-hot slots compare their
/// source column's text case-insensitively against the member value; an
/// unseen category (or absent source column) leaves every member of the group
/// at 0.0. Columns in the record that no slot references are ignored.
pub fn assemble(record: &RawRecord, schema: &FeatureSchema) -> Result<FeatureVector> {
    let mut values = Vec::with_capacity(schema.len());

    for slot in schema.slots() {
        let value = match &slot.kind {
            SlotKind::Direct => direct_value(record, &slot.name)?,
            SlotKind::OneHotMember {
                source_column,
                match_value,
            } => one_hot_value(record, source_column, match_value),
        };
        values.push(value);
    }

    Ok(FeatureVector::new(values))
}

fn direct_value(record: &RawRecord, column: &str) -> Result<f32> {
    let raw = record
        .get(column)
        .ok_or_else(|| WeldError::SchemaMismatch(column.to_string()))?;

    raw.as_f64().map(|v| v as f32).ok_or_else(|| {
        WeldError::MalformedValue {
            column: column.to_string(),
            value: match raw {
                RawValue::Text(s) => s.clone(),
                RawValue::Null => "null".to_string(),
                other => format!("{other:?}"),
            },
        }
    })
}

fn one_hot_value(record: &RawRecord, source_column: &str, match_value: &str) -> f32 {
    let matched = record
        .get(source_column)
        .and_then(|raw| raw.as_text())
        .map(|text| text.trim().eq_ignore_ascii_case(match_value))
        .unwrap_or(false);

    if matched {
        1.0
    } else {
        0.0
    }
}
