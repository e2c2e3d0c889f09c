//! Loosely typed raw records, as read from tabular sources
//!
//! A record is an immutable column-name -> scalar mapping. Scalars keep
//! whatever type the source gave them; the assembler decides how each one is
//! interpreted.

use polars::prelude::*;
use std::collections::HashMap;

/// A loosely typed scalar from a raw tabular source
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Float(f64),
    Int(i64),
    Text(String),
    Null,
}

impl RawValue {
    /// Numeric view of the value, parsing text if needed
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Float(v) => Some(*v),
            RawValue::Int(v) => Some(*v as f64),
            RawValue::Text(s) => s.trim().parse::<f64>().ok(),
            RawValue::Null => None,
        }
    }

    /// Textual view of the value, for categorical comparison
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawValue::Text(s) => Some(s.clone()),
            RawValue::Int(v) => Some(v.to_string()),
            RawValue::Float(v) => Some(v.to_string()),
            RawValue::Null => None,
        }
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Float(v)
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Int(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

fn from_any_value(value: AnyValue<'_>) -> RawValue {
    match value {
        AnyValue::Null => RawValue::Null,
        AnyValue::Boolean(b) => RawValue::Int(b as i64),
        AnyValue::Int8(v) => RawValue::Int(v as i64),
        AnyValue::Int16(v) => RawValue::Int(v as i64),
        AnyValue::Int32(v) => RawValue::Int(v as i64),
        AnyValue::Int64(v) => RawValue::Int(v),
        AnyValue::UInt8(v) => RawValue::Int(v as i64),
        AnyValue::UInt16(v) => RawValue::Int(v as i64),
        AnyValue::UInt32(v) => RawValue::Int(v as i64),
        AnyValue::UInt64(v) => RawValue::Int(v as i64),
        AnyValue::Float32(v) => RawValue::Float(v as f64),
        AnyValue::Float64(v) => RawValue::Float(v),
        AnyValue::String(s) => RawValue::Text(s.to_string()),
        AnyValue::StringOwned(s) => RawValue::Text(s.to_string()),
        other => RawValue::Text(format!("{other}")),
    }
}

/// One raw tabular row: column name -> loosely typed scalar
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    values: HashMap<String, RawValue>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from (column, value) pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RawValue>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Extract one DataFrame row into a record
    pub fn from_dataframe_row(df: &DataFrame, row: usize) -> crate::error::Result<Self> {
        if row >= df.height() {
            return Err(crate::error::WeldError::DataError(format!(
                "row {row} out of bounds, data has {} rows",
                df.height()
            )));
        }
        let mut values = HashMap::with_capacity(df.width());
        for col in df.get_columns() {
            let value = col.get(row)?;
            values.insert(col.name().to_string(), from_any_value(value));
        }
        Ok(Self { values })
    }

    pub fn get(&self, column: &str) -> Option<&RawValue> {
        self.values.get(column)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
