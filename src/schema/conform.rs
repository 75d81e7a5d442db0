//! Record conformance
//!
//! Checks a raw post-processed object against a stream schema and produces a
//! `Record`. Undeclared keys are dropped at every level that declares its
//! properties; free-form objects pass through unchanged.

use super::model::{Field, FieldType, Schema};
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use serde::Serialize;
use tracing::trace;

/// A record that conforms to its stream schema
///
/// The only way to build one is [`conform_record`], so holding a `Record`
/// means the schema and primary keys were checked.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record(JsonObject);

impl Record {
    /// Field value
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    /// Borrow the underlying object
    pub fn as_object(&self) -> &JsonObject {
        &self.0
    }

    /// Unwrap into the underlying object
    pub fn into_inner(self) -> JsonObject {
        self.0
    }

    /// Render as a JSON value
    pub fn to_value(&self) -> JsonValue {
        JsonValue::Object(self.0.clone())
    }
}

/// Conform a raw object to `schema` and check `key_properties`
pub fn conform_record(
    stream: &str,
    schema: &Schema,
    key_properties: &[String],
    raw: JsonObject,
) -> Result<Record> {
    let conformed = conform_fields(stream, "", schema.fields(), raw)?;

    for key in key_properties {
        match conformed.get(key) {
            None | Some(JsonValue::Null) => {
                return Err(Error::schema(
                    stream,
                    format!("primary key '{key}' is missing or null"),
                ));
            }
            Some(_) => {}
        }
    }

    Ok(Record(conformed))
}

fn conform_fields(
    stream: &str,
    prefix: &str,
    fields: &[Field],
    raw: JsonObject,
) -> Result<JsonObject> {
    let mut out = JsonObject::new();
    for (key, value) in raw {
        let path = join(prefix, &key);
        match fields.iter().find(|f| f.name == key) {
            Some(field) => {
                let value = conform_value(stream, &path, &field.field_type, value)?;
                out.insert(key, value);
            }
            None => trace!(stream, field = %path, "Dropping undeclared field"),
        }
    }
    Ok(out)
}

fn conform_value(
    stream: &str,
    path: &str,
    field_type: &FieldType,
    value: JsonValue,
) -> Result<JsonValue> {
    if value.is_null() {
        return Ok(value);
    }

    match (field_type, value) {
        (FieldType::String, v @ JsonValue::String(_)) => Ok(v),
        (FieldType::Boolean, v @ JsonValue::Bool(_)) => Ok(v),
        (FieldType::Number, v @ JsonValue::Number(_)) => Ok(v),
        (FieldType::Integer, JsonValue::Number(n)) => {
            if n.is_i64() || n.is_u64() {
                Ok(JsonValue::Number(n))
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                        Ok(JsonValue::from(f as i64))
                    }
                    _ => Err(mismatch(stream, path, field_type, &JsonValue::Number(n))),
                }
            }
        }
        (FieldType::Object(fields), JsonValue::Object(map)) => {
            if fields.is_empty() {
                Ok(JsonValue::Object(map))
            } else {
                conform_fields(stream, path, fields, map).map(JsonValue::Object)
            }
        }
        (FieldType::Array(item), JsonValue::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(i, v)| conform_value(stream, &format!("{path}[{i}]"), item, v))
            .collect::<Result<Vec<_>>>()
            .map(JsonValue::Array),
        (_, other) => Err(mismatch(stream, path, field_type, &other)),
    }
}

fn mismatch(stream: &str, path: &str, expected: &FieldType, actual: &JsonValue) -> Error {
    Error::schema(
        stream,
        format!(
            "field '{path}' expected {} but got {}",
            expected.json_type(),
            describe(actual)
        ),
    )
}

fn describe(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}
