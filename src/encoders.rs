//! Fitted categorical encoders.
//!
//! On disk the encoder set is a JSON object mapping a column name to the
//! encoder's fitted classes in sorted order, e.g.
//! `{"Road_Type": ["Dual carriageway", "One way street", ...]}`.
//! A value's code is its index in that list.

use crate::error::{ArtifactError, EncodeError};
use crate::record::RawValue;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct LabelEncoder {
    classes: Vec<RawValue>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<RawValue>) -> Self {
        Self { classes }
    }

    pub fn classes(&self) -> &[RawValue] {
        &self.classes
    }

    pub fn knows(&self, value: &RawValue) -> bool {
        self.classes.contains(value)
    }

    pub fn transform(&self, column: &str, value: &RawValue) -> Result<i64, EncodeError> {
        self.classes
            .iter()
            .position(|c| c == value)
            .map(|idx| idx as i64)
            .ok_or_else(|| EncodeError::UnseenCategory {
                column: column.to_string(),
                value: value.to_string(),
            })
    }
}

/// Column name → fitted encoder. Read-only once loaded.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct EncoderSet {
    encoders: BTreeMap<String, LabelEncoder>,
}

impl EncoderSet {
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

    pub fn from_encoders<I>(encoders: I) -> Self
    where
        I: IntoIterator<Item = (String, LabelEncoder)>,
    {
        Self {
            encoders: encoders.into_iter().collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&LabelEncoder> {
        self.encoders.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.encoders.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.encoders.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }

    /// Replace `value` with its code when `column` has an encoder; pass it
    /// through untouched otherwise.
    pub fn encode(&self, column: &str, value: &RawValue) -> Result<RawValue, EncodeError> {
        match self.encoders.get(column) {
            Some(enc) => enc.transform(column, value).map(RawValue::Int),
            None => Ok(value.clone()),
        }
    }
}
