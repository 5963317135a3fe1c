//! Declared shape of a resource's configuration map
//!
//! Every resource kind declares its fields up front: name, type,
//! required/optional marking and a description. The schema is what the
//! orchestrator validates desired state against, and what textual input
//! (`key=value`) is parsed with.

use std::fmt;

use crate::data::{ResourceData, Value};
use crate::error::{Error, Result};

/// Primitive type of a configuration field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    String,
    Int,
    Bool,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Bool => "bool",
        })
    }
}

/// Declaration of one configuration field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    /// Value must never be logged or echoed back
    pub sensitive: bool,
    /// Environment variable consulted when the field is not set
    pub env_default: Option<&'static str>,
    pub description: &'static str,
}

impl FieldSchema {
    pub const fn required(name: &'static str, field_type: FieldType, description: &'static str) -> Self {
        Self {
            name,
            field_type,
            required: true,
            sensitive: false,
            env_default: None,
            description,
        }
    }

    pub const fn optional(name: &'static str, field_type: FieldType, description: &'static str) -> Self {
        Self {
            name,
            field_type,
            required: false,
            sensitive: false,
            env_default: None,
            description,
        }
    }

    pub const fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub const fn env_default(mut self, var: &'static str) -> Self {
        self.env_default = Some(var);
        self
    }

    /// Parse textual input into a value of this field's type
    pub fn parse(&self, raw: &str) -> Result<Value> {
        match self.field_type {
            FieldType::String => Ok(Value::String(raw.to_string())),
            FieldType::Int => raw
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| Error::invalid_field(self.name, format!("not an integer: {e}"))),
            FieldType::Bool => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(Value::Bool(true)),
                "false" | "0" | "no" => Ok(Value::Bool(false)),
                other => Err(Error::invalid_field(
                    self.name,
                    format!("not a boolean: {other}"),
                )),
            },
        }
    }
}

/// Ordered set of field declarations for one resource kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    version: u32,
    fields: Vec<FieldSchema>,
}

impl Schema {
    pub fn new(version: u32, fields: Vec<FieldSchema>) -> Self {
        Self { version, fields }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Parse a `name`/`raw` pair, rejecting undeclared fields
    pub fn parse_value(&self, name: &str, raw: &str) -> Result<Value> {
        self.field(name)
            .ok_or_else(|| Error::invalid_field(name, "field is not declared by the schema"))?
            .parse(raw)
    }

    /// Fill unset fields that declare an environment default
    pub fn apply_env_defaults(&self, data: &mut ResourceData) {
        for field in &self.fields {
            if data.contains(field.name) {
                continue;
            }
            if let Some(var) = field.env_default
                && let Ok(raw) = std::env::var(var)
            {
                match field.parse(&raw) {
                    Ok(value) => data.set(field.name, value),
                    Err(e) => tracing::warn!("Ignoring environment default {}: {}", var, e),
                }
            }
        }
    }

    /// Check declared types, required fields and unknown keys
    pub fn validate(&self, data: &ResourceData) -> Result<()> {
        for (key, value) in data.values() {
            let field = self
                .field(key)
                .ok_or_else(|| Error::invalid_field(key, "field is not declared by the schema"))?;
            if value.field_type() != field.field_type {
                return Err(Error::invalid_field(
                    key,
                    format!("expected {}, got {}", field.field_type, value.field_type()),
                ));
            }
        }

        for field in self.fields.iter().filter(|f| f.required) {
            match data.get(field.name) {
                Some(value) if !value.is_zero() => {}
                _ => return Err(Error::invalid_field(field.name, "field is required")),
            }
        }

        Ok(())
    }
}
