use crate::encoders::EncoderSet;
use crate::error::{ArtifactError, EncodeError, SchemaError};
use crate::record::{AccidentRecord, RawValue};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Column order the model was trained with (a JSON array of names on disk).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FeatureOrder {
    names: Vec<String>,
}

impl FeatureOrder {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path).map_err(|source| ArtifactError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&txt).map_err(|source| ArtifactError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.names.iter().any(|n| n == column)
    }

    /// Rearrange columns into training order. Every named column must be
    /// present and nothing else may be.
    pub fn arrange(&self, columns: Vec<(String, RawValue)>) -> Result<EncodedRow, SchemaError> {
        let known: HashSet<&str> = self.names.iter().map(String::as_str).collect();
        if let Some((extra, _)) = columns.iter().find(|(c, _)| !known.contains(c.as_str())) {
            return Err(SchemaError::ExtraColumn(extra.clone()));
        }

        let mut ordered = Vec::with_capacity(self.names.len());
        for name in &self.names {
            let value = columns
                .iter()
                .find(|(c, _)| c == name)
                .map(|(_, v)| v.clone())
                .ok_or_else(|| SchemaError::MissingColumn(name.clone()))?;
            ordered.push((name.clone(), value));
        }
        Ok(EncodedRow { columns: ordered })
    }
}

/// Single model input row: encoded values in feature order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedRow {
    columns: Vec<(String, RawValue)>,
}

impl EncodedRow {
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(c, _)| c.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &RawValue> {
        self.columns.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.columns.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn get(&self, column: &str) -> Option<&RawValue> {
        self.columns.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Apply every encoder whose column appears in the record.
pub fn encode_record(
    record: &AccidentRecord,
    encoders: &EncoderSet,
) -> Result<Vec<(String, RawValue)>, EncodeError> {
    record
        .iter()
        .map(|(column, value)| {
            encoders
                .encode(column, value)
                .map(|v| (column.to_string(), v))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<(String, RawValue)> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.to_string(), RawValue::Int(i as i64)))
            .collect()
    }

    fn order(names: &[&str]) -> FeatureOrder {
        FeatureOrder::new(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_arrange_reorders() {
        let row = order(&["c", "a", "b"]).arrange(cols(&["a", "b", "c"])).unwrap();
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["c", "a", "b"]);
        assert_eq!(row.get("a"), Some(&RawValue::Int(0)));
        assert_eq!(row.get("c"), Some(&RawValue::Int(2)));
    }

    #[test]
    fn test_arrange_missing_column() {
        let err = order(&["a", "b", "z"]).arrange(cols(&["a", "b"])).unwrap_err();
        assert_eq!(err, SchemaError::MissingColumn("z".to_string()));
    }

    #[test]
    fn test_arrange_extra_column() {
        let err = order(&["a", "b"]).arrange(cols(&["a", "b", "q"])).unwrap_err();
        assert_eq!(err, SchemaError::ExtraColumn("q".to_string()));
    }

    #[test]
    fn test_parse_feature_order() {
        let fo: FeatureOrder = serde_json::from_str(r#"["Road_Type", "Speed_limit"]"#).unwrap();
        assert_eq!(fo.len(), 2);
        assert!(fo.contains("Speed_limit"));
        assert!(!fo.contains("Day_of_Week"));
    }
}
