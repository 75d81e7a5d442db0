//! Post-processing step implementations

use super::types::{PostProcessStep, PostProcessor};
use crate::error::{Error, Result};
use crate::partition::SyncContext;
use crate::types::{JsonObject, JsonValue};

const CUSTOM_ATTRIBUTES: &str = "custom_attributes";

/// Ordered steps for one stream
#[derive(Debug, Clone, Copy)]
pub struct Pipeline<'a> {
    stream: &'a str,
    steps: &'a [PostProcessStep],
}

impl<'a> Pipeline<'a> {
    pub fn new(stream: &'a str, steps: &'a [PostProcessStep]) -> Self {
        Self { stream, steps }
    }
}

impl PostProcessor for Pipeline<'_> {
    fn post_process(&self, raw: JsonObject, context: &SyncContext) -> Result<Option<JsonObject>> {
        let mut record = raw;
        for step in self.steps {
            record = match step {
                PostProcessStep::NormalizeCustomAttributes => {
                    normalize_custom_attributes(self.stream, record)?
                }
                PostProcessStep::InjectContext { key } => {
                    inject_context(self.stream, record, context, key)?
                }
                PostProcessStep::FlagNonEmpty { source, target } => {
                    flag_non_empty(record, source, target)
                }
                PostProcessStep::Custom(processor) => {
                    match processor.post_process(record, context)? {
                        Some(r) => r,
                        None => return Ok(None),
                    }
                }
            };
        }
        Ok(Some(record))
    }
}

/// Normalize a custom-attribute key: lower-case, spaces become `_`
pub fn normalize_key(key: &str) -> String {
    key.to_lowercase().replace(' ', "_")
}

fn normalize_custom_attributes(stream: &str, mut record: JsonObject) -> Result<JsonObject> {
    match record.remove(CUSTOM_ATTRIBUTES) {
        None => {}
        Some(JsonValue::Null) => {
            record.insert(CUSTOM_ATTRIBUTES.to_string(), JsonValue::Null);
        }
        Some(JsonValue::Object(attrs)) => {
            let normalized: JsonObject = attrs
                .into_iter()
                .map(|(k, v)| (normalize_key(&k), v))
                .collect();
            record.insert(CUSTOM_ATTRIBUTES.to_string(), JsonValue::Object(normalized));
        }
        Some(other) => {
            return Err(Error::schema(
                stream,
                format!("custom_attributes must be an object, got {other}"),
            ));
        }
    }
    Ok(record)
}

fn inject_context(
    stream: &str,
    mut record: JsonObject,
    context: &SyncContext,
    key: &str,
) -> Result<JsonObject> {
    let value = context
        .get(key)
        .ok_or_else(|| Error::missing_context(stream, key))?;
    record.insert(key.to_string(), value.clone());
    Ok(record)
}

fn flag_non_empty(mut record: JsonObject, source: &str, target: &str) -> JsonObject {
    let flag = record
        .get(source)
        .and_then(JsonValue::as_str)
        .is_some_and(|s| !s.is_empty());
    record.insert(target.to_string(), JsonValue::Bool(flag));
    record
}
