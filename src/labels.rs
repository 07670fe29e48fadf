//! Class-index → gesture-name lookup and the model's metadata file.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::RecognizerConfig;
use crate::error::LabelError;

/// Immutable table mapping classifier output indices to display strings.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTable {
    labels: BTreeMap<usize, String>,
}

impl LabelTable {
    /// Builds a table from gestures listed in class-index order.
    pub fn from_gestures<I, S>(gestures: I) -> Result<Self, LabelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: BTreeMap<usize, String> =
            gestures.into_iter().map(Into::<String>::into).enumerate().collect();
        Self::from_map(labels)
    }

    /// Parses a `labels.json` document: an object keyed by stringified class index.
    ///
    /// Keys that spell the same index (`"0"`, `"00"`, `" 0"`) are rejected rather than
    /// resolved in map iteration order.
    pub fn from_json_str(json: &str) -> Result<Self, LabelError> {
        let raw: HashMap<String, String> = serde_json::from_str(json)?;
        let mut labels = BTreeMap::new();
        for (key, name) in raw {
            let index = key
                .trim()
                .parse::<usize>()
                .map_err(|_| LabelError::InvalidIndex(key.clone()))?;
            if labels.insert(index, name).is_some() {
                return Err(LabelError::DuplicateIndex(index));
            }
        }
        Self::from_map(labels)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LabelError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    fn from_map(labels: BTreeMap<usize, String>) -> Result<Self, LabelError> {
        if labels.is_empty() {
            return Err(LabelError::Empty);
        }
        Ok(Self { labels })
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(&index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.labels.iter().map(|(i, s)| (*i, s.as_str()))
    }
}

/// Contents of the `metadata.json` written next to an exported model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    #[serde(default)]
    pub model_name: String,
    #[serde(default)]
    pub version: String,
    pub gestures: Vec<String>,
    pub num_classes: usize,
    pub sequence_length: usize,
    #[serde(default)]
    pub num_landmarks: Option<usize>,
}

impl ModelMetadata {
    pub fn from_json_str(json: &str) -> Result<Self, LabelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LabelError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Rejects a model that cannot be driven with `config`.
    ///
    /// `input_shape` is not checked: exported metadata has been seen to carry a stale
    /// single-hand width while the model itself takes two hands.
    pub fn check_compatible(&self, config: &RecognizerConfig) -> Result<(), LabelError> {
        if self.sequence_length != config.sequence_length {
            return Err(LabelError::MetadataMismatch(format!(
                "model expects {} frames per sequence, config uses {}",
                self.sequence_length, config.sequence_length
            )));
        }
        if self.num_classes != self.gestures.len() {
            return Err(LabelError::MetadataMismatch(format!(
                "num_classes is {} but {} gestures are listed",
                self.num_classes,
                self.gestures.len()
            )));
        }
        if let Some(n) = self.num_landmarks {
            if n != crate::POINTS_PER_HAND {
                return Err(LabelError::MetadataMismatch(format!(
                    "model expects {n} landmarks per hand"
                )));
            }
        }
        Ok(())
    }

    pub fn label_table(&self) -> Result<LabelTable, LabelError> {
        LabelTable::from_gestures(self.gestures.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABELS: &str = r#"{
        "0": "Đau",
        "1": "Bác sĩ",
        "2": "Cần giúp",
        "3": "Thuốc",
        "4": "Cảm ơn"
    }"#;

    const METADATA: &str = r#"{
        "model_name": "V-Sign AI",
        "version": "1.0.0",
        "gestures": ["Đau", "Bác sĩ", "Cần giúp", "Thuốc", "Cảm ơn"],
        "num_classes": 5,
        "sequence_length": 30,
        "num_landmarks": 21,
        "input_shape": [30, 63]
    }"#;

    #[test]
    fn parses_index_keyed_labels() {
        let table = LabelTable::from_json_str(LABELS).expect("labels.json parses");
        assert_eq!(table.len(), 5);
        assert_eq!(table.get(0), Some("Đau"));
        assert_eq!(table.get(4), Some("Cảm ơn"));
        assert_eq!(table.get(5), None);
    }

    #[test]
    fn rejects_non_numeric_keys() {
        let err = LabelTable::from_json_str(r#"{"zero": "Đau"}"#).expect_err("non-numeric key");
        assert!(matches!(err, LabelError::InvalidIndex(k) if k == "zero"));
    }

    #[test]
    fn rejects_keys_aliasing_the_same_index() {
        for _ in 0..20 {
            let err = LabelTable::from_json_str(r#"{"0": "A", "00": "B", " 0": "C"}"#)
                .expect_err("aliased keys must not load");
            assert!(matches!(err, LabelError::DuplicateIndex(0)));
        }
    }

    #[test]
    fn rejects_empty_table() {
        assert!(matches!(LabelTable::from_json_str("{}"), Err(LabelError::Empty)));
        assert!(matches!(
            LabelTable::from_gestures(Vec::<String>::new()),
            Err(LabelError::Empty)
        ));
    }

    #[test]
    fn metadata_yields_same_table_as_labels_file() {
        let meta = ModelMetadata::from_json_str(METADATA).expect("metadata.json parses");
        meta.check_compatible(&RecognizerConfig::default())
            .expect("metadata matches the default config");
        assert_eq!(
            meta.label_table().expect("metadata lists gestures"),
            LabelTable::from_json_str(LABELS).expect("labels.json parses")
        );
    }

    #[test]
    fn metadata_with_other_window_is_incompatible() {
        let meta = ModelMetadata::from_json_str(METADATA).expect("metadata.json parses");
        let config = RecognizerConfig {
            sequence_length: 45,
            ..RecognizerConfig::default()
        };
        assert!(matches!(
            meta.check_compatible(&config),
            Err(LabelError::MetadataMismatch(_))
        ));
    }

    #[test]
    fn metadata_with_inconsistent_class_count_is_incompatible() {
        let mut meta = ModelMetadata::from_json_str(METADATA).expect("metadata.json parses");
        meta.num_classes = 6;
        assert!(meta.check_compatible(&RecognizerConfig::default()).is_err());
    }
}
