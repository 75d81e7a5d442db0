//! Decoder implementations

use super::types::{RecordDecoder, Records};
use crate::error::{Error, Result};
use crate::types::JsonValue;

// ============================================================================
// JSON Decoder
// ============================================================================

/// JSON decoder with a declarative record path
///
/// Supported paths:
/// - `$` : the whole body is one record
/// - `$.a.b[*]` : every element of the array at `a.b`
/// - anything else is evaluated with jsonpath-rust
#[derive(Debug, Clone)]
pub struct JsonDecoder {
    record_path: String,
}

impl Default for JsonDecoder {
    fn default() -> Self {
        Self::with_path("$")
    }
}

impl JsonDecoder {
    /// Create a decoder that treats the whole body as one record
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a JSON decoder with a record path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: path.into(),
        }
    }

    /// The configured record path
    pub fn record_path(&self) -> &str {
        &self.record_path
    }
}

impl RecordDecoder for JsonDecoder {
    fn extract(&self, body: JsonValue) -> Result<Records> {
        let path = self.record_path.as_str();
        if path == "$" {
            return Ok(Records::new(path, vec![body]));
        }

        let items = match simple_pointer(path) {
            Some(pointer) => take_array(body, &pointer),
            None => extract_with_jsonpath(&body, path)?,
        };
        Ok(Records::new(path, items))
    }
}

/// Convert `$.a.b[*]` into the JSON pointer `/a/b`
///
/// Returns `None` for anything that is not a plain dotted path ending in
/// `[*]`.
fn simple_pointer(path: &str) -> Option<String> {
    let inner = path.strip_prefix("$.")?.strip_suffix("[*]")?;
    let valid = !inner.is_empty()
        && inner
            .split('.')
            .all(|seg| !seg.is_empty() && seg.chars().all(|c| c.is_alphanumeric() || c == '_'));
    valid.then(|| inner.split('.').map(|seg| format!("/{seg}")).collect())
}

/// Take the array at `pointer`; absent or null yields nothing
fn take_array(mut body: JsonValue, pointer: &str) -> Vec<JsonValue> {
    match body.pointer_mut(pointer).map(JsonValue::take) {
        Some(JsonValue::Array(items)) => items,
        Some(JsonValue::Null) | None => Vec::new(),
        Some(other) => vec![other],
    }
}

/// Extract records using jsonpath-rust
fn extract_with_jsonpath(value: &JsonValue, path: &str) -> Result<Vec<JsonValue>> {
    use jsonpath_rust::JsonPath;

    let jp = JsonPath::try_from(path).map_err(|e| Error::JsonPath {
        message: format!("Invalid JSONPath: {e}"),
    })?;

    match jp.find(value) {
        JsonValue::Array(arr) => Ok(arr),
        JsonValue::Null => Ok(vec![]),
        other => Ok(vec![other]),
    }
}
