//! Feature schema: the ordered definition of the vector the model expects
//!
//! Loaded from the feature-mapping artifact written by the training pipeline.
//! One-hot membership is explicit in the slot type; nothing here infers
//! groupings from column-name conventions at prediction time.

use crate::error::{Result, WeldError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// What a single feature slot holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotKind {
    /// Value taken directly from the raw column with the slot's name
    Direct,
    /// One-hot member: 1.0 when `source_column`'s value equals `match_value`
    OneHotMember {
        source_column: String,
        match_value: String,
    },
}

/// One named position in the feature vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSlot {
    pub name: String,
    pub kind: SlotKind,
}

/// Ordered, immutable feature schema
///
/// Slot order must match the order used at training time; the backend
/// consumes features positionally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSchema {
    slots: Vec<FeatureSlot>,
}

/// On-disk feature-mapping artifact (snake_case JSON from the training side)
#[derive(Debug, Deserialize)]
struct MappingFile {
    feature_count: usize,
    feature_columns: Vec<String>,
    /// Categorical source column -> vocabulary seen at training time
    #[serde(default)]
    categorical_features: HashMap<String, Vec<String>>,
}

impl FeatureSchema {
    /// Build a schema from explicit slots
    pub fn new(slots: Vec<FeatureSlot>) -> Result<Self> {
        let mut seen = HashSet::new();
        for slot in &slots {
            if !seen.insert(slot.name.as_str()) {
                return Err(WeldError::ConfigError(format!(
                    "duplicate feature slot '{}'",
                    slot.name
                )));
            }
        }
        Ok(Self { slots })
    }

    /// Load a schema from a feature-mapping JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            WeldError::ConfigError(format!("cannot open feature mapping {}: {e}", path.display()))
        })?;
        let mapping: MappingFile = serde_json::from_reader(BufReader::new(file))?;
        Self::from_mapping(mapping)
    }

    fn from_mapping(mapping: MappingFile) -> Result<Self> {
        if mapping.feature_count != mapping.feature_columns.len() {
            return Err(WeldError::ConfigError(format!(
                "feature mapping declares {} features but lists {} columns",
                mapping.feature_count,
                mapping.feature_columns.len()
            )));
        }

        let slots = mapping
            .feature_columns
            .iter()
            .map(|name| FeatureSlot {
                name: name.clone(),
                kind: classify_column(name, &mapping.categorical_features),
            })
            .collect();

        Self::new(slots)
    }

    /// Number of slots (== feature vector length)
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots in vector order
    pub fn slots(&self) -> &[FeatureSlot] {
        &self.slots
    }

    /// Slot names in vector order
    pub fn column_names(&self) -> Vec<&str> {
        self.slots.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Resolve a mapping column to its slot kind using the supplied vocabulary
///
/// A column named `{source}_{value}` for a declared categorical source and one
/// of its vocabulary values is a one-hot member; everything else is direct.
fn classify_column(name: &str, categorical: &HashMap<String, Vec<String>>) -> SlotKind {
    for (source, vocabulary) in categorical {
        for value in vocabulary {
            if name == format!("{source}_{value}") {
                return SlotKind::OneHotMember {
                    source_column: source.clone(),
                    match_value: value.clone(),
                };
            }
        }
    }
    SlotKind::Direct
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_mapping(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_mapping_with_onehot_groups() {
        let file = write_mapping(
            r#"{
                "feature_count": 4,
                "feature_columns": ["AnomalyScore", "RegionArea", "AD_Decision_Bad", "AD_Decision_Good"],
                "categorical_features": {"AD_Decision": ["Bad", "Good"]}
            }"#,
        );

        let schema = FeatureSchema::load(file.path()).unwrap();
        assert_eq!(schema.len(), 4);
        assert_eq!(schema.slots()[0].kind, SlotKind::Direct);
        assert_eq!(
            schema.slots()[2].kind,
            SlotKind::OneHotMember {
                source_column: "AD_Decision".into(),
                match_value: "Bad".into(),
            }
        );
    }

    #[test]
    fn test_order_preserved() {
        let file = write_mapping(
            r#"{"feature_count": 3, "feature_columns": ["c", "a", "b"]}"#,
        );
        let schema = FeatureSchema::load(file.path()).unwrap();
        assert_eq!(schema.column_names(), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_count_mismatch_rejected() {
        let file = write_mapping(r#"{"feature_count": 5, "feature_columns": ["a", "b"]}"#);
        let err = FeatureSchema::load(file.path()).unwrap_err();
        assert!(matches!(err, WeldError::ConfigError(_)));
    }

    #[test]
    fn test_duplicate_slot_rejected() {
        let file = write_mapping(r#"{"feature_count": 2, "feature_columns": ["a", "a"]}"#);
        let err = FeatureSchema::load(file.path()).unwrap_err();
        assert!(matches!(err, WeldError::ConfigError(_)));
    }

    #[test]
    fn test_undeclared_prefix_stays_direct() {
        // "Weld_Num" looks like a one-hot column by naming convention, but no
        // categorical declaration covers it, so it must stay direct.
        let file = write_mapping(
            r#"{
                "feature_count": 1,
                "feature_columns": ["Weld_Num"],
                "categorical_features": {"AD_Decision": ["Bad", "Good"]}
            }"#,
        );
        let schema = FeatureSchema::load(file.path()).unwrap();
        assert_eq!(schema.slots()[0].kind, SlotKind::Direct);
    }
}
