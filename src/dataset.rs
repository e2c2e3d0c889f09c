//! Prepared dataset: rows already mapped into schema order
//!
//! One tabular CSV artifact persists the assembled feature rows. When it is
//! absent it is regenerated from the raw source table through the assembler
//! and written back, so later runs skip assembly entirely.

use crate::assembler::{assemble, FeatureVector};
use crate::error::{Result, WeldError};
use crate::record::{RawRecord, RawValue};
use crate::schema::FeatureSchema;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Load a tabular CSV into a DataFrame
pub fn load_table(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).map_err(|e| {
        WeldError::DataError(format!("cannot open {}: {e}", path.display()))
    })?;

    let reader = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .into_reader_with_file_handle(file);

    reader
        .finish()
        .map_err(|e| WeldError::DataError(e.to_string()))
}

/// Feature rows in schema order, ready to feed the invoker
#[derive(Debug)]
pub struct PreparedDataset {
    df: DataFrame,
}

impl PreparedDataset {
    /// Load the preprocessed artifact, regenerating it from the raw table
    /// when absent
    pub fn prepare(
        raw_path: Option<&Path>,
        preprocessed_path: &Path,
        schema: &FeatureSchema,
    ) -> Result<Self> {
        if preprocessed_path.exists() {
            let df = load_table(preprocessed_path)?;
            Self::from_dataframe(df, schema)
        } else {
            let raw_path = raw_path.ok_or_else(|| {
                WeldError::ConfigError(format!(
                    "{} is absent and no rawDataPath is configured to regenerate it",
                    preprocessed_path.display()
                ))
            })?;
            let dataset = Self::regenerate(raw_path, schema)?;
            dataset.save(preprocessed_path)?;
            info!(
                rows = dataset.len(),
                path = %preprocessed_path.display(),
                "regenerated preprocessed dataset"
            );
            Ok(dataset)
        }
    }

    /// Wrap an already-loaded table, checking it matches the schema layout
    pub fn from_dataframe(df: DataFrame, schema: &FeatureSchema) -> Result<Self> {
        let names: Vec<&str> = df.get_column_names().into_iter().map(|s| s.as_str()).collect();
        if names != schema.column_names() {
            return Err(WeldError::DataError(format!(
                "preprocessed columns {:?} do not match schema order {:?}",
                names,
                schema.column_names()
            )));
        }
        Ok(Self { df })
    }

    /// Rebuild the artifact by assembling every raw row
    fn regenerate(raw_path: &Path, schema: &FeatureSchema) -> Result<Self> {
        let raw = load_table(raw_path)?;
        let n_rows = raw.height();

        let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(n_rows); schema.len()];
        for row in 0..n_rows {
            let record = RawRecord::from_dataframe_row(&raw, row)?;
            let vector = assemble(&record, schema).map_err(|e| {
                WeldError::DataError(format!("raw row {row}: {e}"))
            })?;
            for (j, value) in vector.as_slice().iter().enumerate() {
                columns[j].push(*value as f64);
            }
        }

        let series: Vec<Column> = schema
            .column_names()
            .iter()
            .zip(columns)
            .map(|(name, values)| Series::new((*name).into(), &values).into())
            .collect();

        let df = DataFrame::new(series).map_err(|e| WeldError::DataError(e.to_string()))?;
        Ok(Self { df })
    }

    /// Persist the prepared rows as CSV
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut df = self.df.clone();
        let mut file = File::create(path)
            .map_err(|e| WeldError::DataError(format!("cannot create {}: {e}", path.display())))?;
        CsvWriter::new(&mut file)
            .finish(&mut df)
            .map_err(|e| WeldError::DataError(e.to_string()))
    }

    /// Number of prepared rows
    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Feature vector for one prepared row. Values are already numeric and
    /// in schema order, so no assembly happens here.
    pub fn row_vector(&self, row: usize) -> Result<FeatureVector> {
        if row >= self.df.height() {
            return Err(WeldError::DataError(format!(
                "row {row} out of bounds, dataset has {} rows",
                self.df.height()
            )));
        }

        let mut values = Vec::with_capacity(self.df.width());
        for col in self.df.get_columns() {
            let any = col.get(row)?;
            let raw = match any {
                AnyValue::Float64(v) => RawValue::Float(v),
                AnyValue::Float32(v) => RawValue::Float(v as f64),
                AnyValue::Int64(v) => RawValue::Int(v),
                AnyValue::Int32(v) => RawValue::Int(v as i64),
                other => RawValue::Text(format!("{other}")),
            };
            let value = raw.as_f64().ok_or_else(|| WeldError::MalformedValue {
                column: col.name().to_string(),
                value: format!("{:?}", raw),
            })?;
            values.push(value as f32);
        }
        Ok(FeatureVector::new(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FeatureSlot, SlotKind};
    use tempfile::tempdir;

    fn schema() -> FeatureSchema {
        FeatureSchema::new(vec![
            FeatureSlot {
                name: "MaxVal".into(),
                kind: SlotKind::Direct,
            },
            FeatureSlot {
                name: "AD_Decision_Bad".into(),
                kind: SlotKind::OneHotMember {
                    source_column: "AD_Decision".into(),
                    match_value: "Bad".into(),
                },
            },
            FeatureSlot {
                name: "AD_Decision_Good".into(),
                kind: SlotKind::OneHotMember {
                    source_column: "AD_Decision".into(),
                    match_value: "Good".into(),
                },
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_regenerate_and_reload() {
        let dir = tempdir().unwrap();
        let raw_path = dir.path().join("raw.csv");
        let prep_path = dir.path().join("prep.csv");

        std::fs::write(
            &raw_path,
            "MaxVal,AD_Decision,GT_Label\n0.9,Bad,Bad\n0.1,Good,Good\n0.5,Odd,Good\n",
        )
        .unwrap();

        // First call regenerates and persists
        let dataset = PreparedDataset::prepare(Some(&raw_path), &prep_path, &schema()).unwrap();
        assert_eq!(dataset.len(), 3);
        assert!(prep_path.exists());

        let v0 = dataset.row_vector(0).unwrap();
        assert_eq!(v0.as_slice(), &[0.9, 1.0, 0.0]);
        let v2 = dataset.row_vector(2).unwrap();
        assert_eq!(v2.as_slice(), &[0.5, 0.0, 0.0]); // unseen category

        // Second call loads the artifact without the raw table
        let reloaded = PreparedDataset::prepare(None, &prep_path, &schema()).unwrap();
        assert_eq!(reloaded.len(), 3);
        assert_eq!(reloaded.row_vector(1).unwrap().as_slice(), &[0.1, 0.0, 1.0]);
    }

    #[test]
    fn test_missing_artifact_without_raw_source() {
        let dir = tempdir().unwrap();
        let prep_path = dir.path().join("prep.csv");
        let err = PreparedDataset::prepare(None, &prep_path, &schema()).unwrap_err();
        assert!(matches!(err, WeldError::ConfigError(_)));
    }

    #[test]
    fn test_column_order_enforced() {
        let df = DataFrame::new(vec![
            Series::new("AD_Decision_Bad".into(), &[1.0_f64]).into(),
            Series::new("MaxVal".into(), &[0.9_f64]).into(),
            Series::new("AD_Decision_Good".into(), &[0.0_f64]).into(),
        ])
        .unwrap();

        let err = PreparedDataset::from_dataframe(df, &schema()).unwrap_err();
        assert!(matches!(err, WeldError::DataError(_)));
    }

    #[test]
    fn test_row_vector_out_of_bounds() {
        let df = DataFrame::new(vec![
            Series::new("MaxVal".into(), &[0.9_f64]).into(),
            Series::new("AD_Decision_Bad".into(), &[1.0_f64]).into(),
            Series::new("AD_Decision_Good".into(), &[0.0_f64]).into(),
        ])
        .unwrap();
        let dataset = PreparedDataset::from_dataframe(df, &schema()).unwrap();
        assert!(dataset.row_vector(9).is_err());
    }
}
