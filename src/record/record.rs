//! Records: a table identity plus a field-name to value map

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::value::Value;

static NULL_VALUE: Value = Value::Null;

/// A single row of a table.
///
/// Field values are kept in a sorted map so serialized output is deterministic.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Owning table name
    table_name: String,
    /// Field values
    #[serde(default)]
    values: BTreeMap<String, Value>,
}

impl Record {
    /// Creates an empty record for a table
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            values: BTreeMap::new(),
        }
    }

    /// Builder-style value setter
    pub fn with_value(mut self, field_name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(field_name.into(), value.into());
        self
    }

    /// Builds a record from a JSON object. Returns `None` for non-objects.
    pub fn from_json(table_name: impl Into<String>, json: &serde_json::Value) -> Option<Self> {
        let object = json.as_object()?;
        let values = object
            .iter()
            .map(|(k, v)| (k.clone(), Value::from_json(v)))
            .collect();
        Some(Self {
            table_name: table_name.into(),
            values,
        })
    }

    /// Returns the record body as a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        serde_json::Value::Object(map)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Returns the value of a field; missing fields read as null.
    pub fn value(&self, field_name: &str) -> &Value {
        self.values.get(field_name).unwrap_or(&NULL_VALUE)
    }

    pub fn set_value(&mut self, field_name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(field_name.into(), value.into());
    }

    pub fn remove_value(&mut self, field_name: &str) -> Option<Value> {
        self.values.remove(field_name)
    }

    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    /// Copies every value of `other` onto this record
    pub fn merge_from(&mut self, other: &Record) {
        for (field_name, value) in &other.values {
            self.values.insert(field_name.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_field_reads_null() {
        let record = Record::new("state").with_value("name", "Missouri");
        assert_eq!(record.value("name"), &Value::from("Missouri"));
        assert!(record.value("population").is_null());
    }

    #[test]
    fn test_from_json_requires_object() {
        let record = Record::from_json("state", &json!({"id": 1, "name": "Illinois"})).unwrap();
        assert_eq!(record.table_name(), "state");
        assert_eq!(record.value("id"), &Value::Integer(1));

        assert!(Record::from_json("state", &json!([1, 2, 3])).is_none());
    }

    #[test]
    fn test_merge_overwrites_fields() {
        let mut record = Record::new("state").with_value("id", 1).with_value("name", "Ill");
        let patch = Record::new("state").with_value("name", "Illinois");
        record.merge_from(&patch);

        assert_eq!(record.value("name"), &Value::from("Illinois"));
        assert_eq!(record.value("id"), &Value::Integer(1));
    }
}
