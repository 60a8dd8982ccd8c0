//! The live record of one form instance: field name → current value.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FieldsError, Result};
use crate::registry::FieldRegistry;

/// Mapping from field name to current value, in insertion order.
///
/// Absent keys and explicit `null` are distinct in storage but both read as
/// "no value" to rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData {
    values: IndexMap<String, Value>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh record seeded with every field's initial value.
    pub fn initial(registry: &FieldRegistry) -> Self {
        registry
            .list_fields()
            .iter()
            .map(|field| (field.name.clone(), field.initial_value()))
            .collect()
    }

    /// Build from a JSON object.
    ///
    /// Keys follow the iteration order of `serde_json::Map`, which is sorted
    /// unless serde_json's `preserve_order` feature is on. Deserialize into
    /// `FormData` directly to keep source order.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(FieldsError::InvalidFormData {
                message: format!("expected a JSON object, got {}", json_kind(&other)),
            }),
        }
    }

    /// Convert to a JSON object. Serialize `FormData` itself to keep key order.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Set a value, returning the previous one.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// String value of a field, if it holds one.
    pub fn str_value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Loose truthiness, the way form predicates usually test values:
    /// absent, null, false, 0, NaN and "" are falsy; everything else,
    /// including empty arrays and objects, is truthy.
    pub fn is_truthy(&self, name: &str) -> bool {
        match self.get(name) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(_)) | Some(Value::Object(_)) => true,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
