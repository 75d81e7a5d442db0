//! Decoder types and traits
//!
//! Defines the core decoder abstractions.

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};

/// Trait for decoding response bodies into records
pub trait RecordDecoder: Send + Sync {
    /// Locate the records inside a parsed body
    fn extract(&self, body: JsonValue) -> Result<Records>;
}

/// Lazy, finite, single-pass sequence of raw records
///
/// Each item is checked to be a JSON object as it is pulled; anything else
/// yields a `RecordExtraction` error.
#[derive(Debug)]
pub struct Records {
    path: String,
    items: std::vec::IntoIter<JsonValue>,
}

impl Records {
    pub(crate) fn new(path: impl Into<String>, items: Vec<JsonValue>) -> Self {
        Self {
            path: path.into(),
            items: items.into_iter(),
        }
    }
}

impl Iterator for Records {
    type Item = Result<JsonObject>;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next().map(|item| match item {
            JsonValue::Object(map) => Ok(map),
            other => Err(Error::RecordExtraction {
                path: self.path.clone(),
                message: format!("expected an object, got {other}"),
            }),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}
