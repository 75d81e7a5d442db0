//! Partition types
//!
//! A sync context scopes one child fetch to one parent record.

use crate::types::JsonValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parent-derived key set for one child fetch
///
/// Created per parent record, passed unchanged through the child's whole
/// pagination, dropped when that fetch completes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncContext {
    values: BTreeMap<String, JsonValue>,
}

impl SyncContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.values.get(key)
    }

    /// Get a value rendered as a string (strings unquoted, numbers as-is)
    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.values.get(key)? {
            JsonValue::String(s) => Some(s.clone()),
            JsonValue::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Whether the context holds no keys
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate keys and values in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.values.iter()
    }

    /// Restrict to the given keys
    ///
    /// Used to derive the state partition for a context.
    pub fn project(&self, keys: &[String]) -> SyncContext {
        SyncContext {
            values: self
                .values
                .iter()
                .filter(|(k, _)| keys.iter().any(|key| key == *k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Render as a JSON value
    pub fn to_value(&self) -> JsonValue {
        serde_json::to_value(&self.values).unwrap_or_default()
    }
}

/// One context key copied from a parent record field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextField {
    /// Key in the child's sync context
    pub context_key: String,
    /// Dot path of the field in the parent record
    pub parent_field: String,
}

/// Reference from a child stream to its parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentLink {
    /// Name of the parent stream
    pub stream: String,
    /// Fields copied from each parent record into the child context
    pub context: Vec<ContextField>,
}

impl ParentLink {
    /// Create a parent link with a single context key
    pub fn new(
        stream: impl Into<String>,
        context_key: impl Into<String>,
        parent_field: impl Into<String>,
    ) -> Self {
        Self {
            stream: stream.into(),
            context: vec![ContextField {
                context_key: context_key.into(),
                parent_field: parent_field.into(),
            }],
        }
    }
}
