//! The flat configuration map handed over by the orchestrator
//!
//! A [`ResourceData`] holds one [`Value`] per schema-declared field plus the
//! identifier of the remote entity once it exists. It is the only state this
//! system persists; resources translate between it and typed API structs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::schema::FieldType;

/// A loosely-typed configuration value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean field
    Bool(bool),
    /// Integer field
    Int(i64),
    /// String field
    String(String),
}

impl Value {
    /// The zero value used when a field is not set
    pub fn zero(field_type: FieldType) -> Self {
        match field_type {
            FieldType::String => Value::String(String::new()),
            FieldType::Int => Value::Int(0),
            FieldType::Bool => Value::Bool(false),
        }
    }

    /// The type of this value
    pub fn field_type(&self) -> FieldType {
        match self {
            Value::Bool(_) => FieldType::Bool,
            Value::Int(_) => FieldType::Int,
            Value::String(_) => FieldType::String,
        }
    }

    /// Whether this is the zero value of its type
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Bool(b) => !b,
            Value::Int(i) => *i == 0,
            Value::String(s) => s.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Owned string, or a message naming the actual type
    pub fn expect_string(&self) -> std::result::Result<String, String> {
        self.as_str()
            .map(str::to_string)
            .ok_or_else(|| format!("expected string, got {}", self.field_type()))
    }

    /// Boolean, or a message naming the actual type
    pub fn expect_bool(&self) -> std::result::Result<bool, String> {
        self.as_bool()
            .ok_or_else(|| format!("expected bool, got {}", self.field_type()))
    }

    /// Integer narrowed to `T`, rejecting out-of-range values
    pub fn expect_int<T: TryFrom<i64>>(&self) -> std::result::Result<T, String> {
        let raw = self
            .as_int()
            .ok_or_else(|| format!("expected int, got {}", self.field_type()))?;
        T::try_from(raw).map_err(|_| format!("{raw} is out of range"))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(i64::from(value))
    }
}

/// Lossy above `i64::MAX`: such values saturate to `i64::MAX`.
///
/// Service identifiers and counters stay far below that bound; use
/// `i64::try_from` first where an out-of-range value must be an error.
impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

/// Configuration map for one resource instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default)]
    values: BTreeMap<String, Value>,
}

impl ResourceData {
    /// Create an empty configuration map (no identifier recorded)
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded identifier, if the entity exists
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Record the identifier assigned by the remote service
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Forget the identifier (the entity is gone)
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    /// Parse the recorded identifier
    pub fn parsed_id<T: FromStr>(&self) -> Result<T> {
        let raw = self.id.as_deref().ok_or(Error::MissingId)?;
        raw.parse().map_err(|_| Error::InvalidId(raw.to_string()))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// String value of a field, if set and of string type
    pub fn string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Integer value of a field, if set and of int type
    pub fn int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_int)
    }

    /// Boolean value of a field, if set and of bool type
    pub fn bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Iterate over all set fields in key order
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
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

    #[test]
    fn test_zero_values() {
        assert_eq!(Value::zero(FieldType::String), Value::from(""));
        assert_eq!(Value::zero(FieldType::Int), Value::from(0i64));
        assert_eq!(Value::zero(FieldType::Bool), Value::from(false));
        assert!(Value::zero(FieldType::Int).is_zero());
        assert!(!Value::from("x").is_zero());
    }

    #[test]
    fn test_expect_int_range_checked() {
        assert_eq!(Value::from(3i64).expect_int::<u32>(), Ok(3));
        assert!(Value::from(-1i64).expect_int::<u32>().is_err());
        assert!(Value::from("3").expect_int::<u32>().is_err());
    }

    #[test]
    fn test_u64_conversion_saturates() {
        assert_eq!(Value::from(42u64), Value::Int(42));
        assert_eq!(Value::from(i64::MAX as u64), Value::Int(i64::MAX));
        assert_eq!(Value::from(u64::MAX), Value::Int(i64::MAX));
    }

    #[test]
    fn test_parsed_id() {
        let mut data = ResourceData::new();
        assert!(matches!(data.parsed_id::<u64>(), Err(Error::MissingId)));

        data.set_id("1234");
        assert_eq!(data.parsed_id::<u64>().unwrap(), 1234);

        data.set_id("abc");
        assert!(matches!(data.parsed_id::<u64>(), Err(Error::InvalidId(id)) if id == "abc"));

        data.clear_id();
        assert_eq!(data.id(), None);
    }

    #[test]
    fn test_json_shape() {
        let mut data = ResourceData::new();
        data.set_id("42");
        data.set("name", "tracker");
        data.set("iteration_length", 2i64);
        data.set("public", true);

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "42",
                "values": {"iteration_length": 2, "name": "tracker", "public": true}
            })
        );

        let back: ResourceData = serde_json::from_value(json).unwrap();
        assert_eq!(back, data);
    }
}
