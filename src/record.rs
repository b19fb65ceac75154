use crate::error::RecordError;
use crate::fields::{lookup_code, Conversion, FormField, FIELDS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single cell: either a display string or an integer.
///
/// Encoder classes use the same type, so a string "1" never matches an
/// integer class 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Int(i64),
    Text(String),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Int(v) => write!(f, "{}", v),
            RawValue::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Int(v)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl FormField {
    /// Check a display selection against the closed option list and turn it
    /// into the value the model was trained on.
    pub fn convert(&self, display: &str) -> Result<RawValue, RecordError> {
        let invalid = || RecordError::InvalidOption {
            column: self.column,
            value: display.to_string(),
        };
        if !self.options.contains(&display) {
            return Err(invalid());
        }
        match self.conversion {
            Conversion::Categorical | Conversion::Count => Ok(RawValue::Text(display.to_string())),
            Conversion::Lookup(table) => lookup_code(table, display).map(RawValue::Int).ok_or_else(invalid),
            Conversion::Integer => display.parse::<i64>().map(RawValue::Int).map_err(|_| invalid()),
        }
    }
}

/// One accident as assembled from a form submission, keyed by trained
/// column name, in form order.
#[derive(Debug, Clone, PartialEq)]
pub struct AccidentRecord {
    values: Vec<(String, RawValue)>,
}

impl AccidentRecord {
    /// Build a record from display selections. Every form field must be
    /// present; keys that are not form fields are ignored.
    pub fn from_selections<'a, F>(mut selection: F) -> Result<Self, RecordError>
    where
        F: FnMut(&str) -> Option<&'a str>,
    {
        let mut values = Vec::with_capacity(FIELDS.len());
        for f in FIELDS.iter() {
            let display = selection(f.column).ok_or(RecordError::MissingField { column: f.column })?;
            values.push((f.column.to_string(), f.convert(display)?));
        }
        Ok(Self { values })
    }

    pub fn from_map(map: &HashMap<String, String>) -> Result<Self, RecordError> {
        Self::from_selections(|column| map.get(column).map(String::as_str))
    }

    /// Record with arbitrary columns, bypassing the form.
    pub fn from_values(values: Vec<(String, RawValue)>) -> Self {
        Self { values }
    }

    pub fn get(&self, column: &str) -> Option<&RawValue> {
        self.values.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(c, _)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.values.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::*;

    fn first_options() -> HashMap<String, String> {
        FIELDS
            .iter()
            .map(|f| (f.column.to_string(), f.options[0].to_string()))
            .collect()
    }

    #[test]
    fn test_conversions() {
        let mut sel = first_options();
        sel.insert(DAY_OF_WEEK_COLUMN.to_string(), "Wednesday".to_string());
        sel.insert(URBAN_OR_RURAL_AREA.to_string(), "Rural".to_string());
        sel.insert(SPEED_LIMIT.to_string(), "30".to_string());
        sel.insert(NUMBER_OF_VEHICLES.to_string(), "5+".to_string());

        let record = AccidentRecord::from_map(&sel).unwrap();
        assert_eq!(record.len(), 11);
        assert_eq!(record.get(DAY_OF_WEEK_COLUMN), Some(&RawValue::Int(3)));
        assert_eq!(record.get(URBAN_OR_RURAL_AREA), Some(&RawValue::Int(2)));
        assert_eq!(record.get(SPEED_LIMIT), Some(&RawValue::Int(30)));
        assert_eq!(record.get(NUMBER_OF_VEHICLES), Some(&RawValue::from("5+")));
        assert_eq!(
            record.get(WEATHER_CONDITIONS),
            Some(&RawValue::from("Fine without high winds"))
        );
    }

    #[test]
    fn test_columns_follow_form_order() {
        let record = AccidentRecord::from_map(&first_options()).unwrap();
        let cols: Vec<&str> = record.columns().collect();
        let expected: Vec<&str> = FIELDS.iter().map(|f| f.column).collect();
        assert_eq!(cols, expected);
    }

    #[test]
    fn test_rejects_value_outside_options() {
        let mut sel = first_options();
        sel.insert(SPEED_LIMIT.to_string(), "25".to_string());
        let err = AccidentRecord::from_map(&sel).unwrap_err();
        assert_eq!(
            err,
            RecordError::InvalidOption {
                column: SPEED_LIMIT,
                value: "25".to_string()
            }
        );
    }

    #[test]
    fn test_padded_value_is_not_an_option() {
        let mut sel = first_options();
        sel.insert(ROAD_SURFACE_CONDITIONS.to_string(), " Dry ".to_string());
        let err = AccidentRecord::from_map(&sel).unwrap_err();
        assert_eq!(
            err,
            RecordError::InvalidOption {
                column: ROAD_SURFACE_CONDITIONS,
                value: " Dry ".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_missing_field() {
        let mut sel = first_options();
        sel.remove(ROAD_TYPE);
        let err = AccidentRecord::from_map(&sel).unwrap_err();
        assert_eq!(err, RecordError::MissingField { column: ROAD_TYPE });
    }

    #[test]
    fn test_extra_keys_ignored() {
        let mut sel = first_options();
        sel.insert("submit".to_string(), "Predict Severity".to_string());
        assert!(AccidentRecord::from_map(&sel).is_ok());
    }

    #[test]
    fn test_raw_value_json_shape() {
        let v: Vec<RawValue> = serde_json::from_str(r#"[1, "Dry"]"#).unwrap();
        assert_eq!(v, vec![RawValue::Int(1), RawValue::from("Dry")]);
    }
}
