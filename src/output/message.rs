//! Output message types

use crate::schema::Record;
use crate::state::State;
use crate::streams::StreamDefinition;
use crate::types::JsonValue;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One line of tap output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// Stream schema, emitted before the stream's first record
    Schema {
        stream: String,
        schema: JsonValue,
        key_properties: Vec<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        bookmark_properties: Vec<String>,
    },

    /// A conformed record
    Record {
        stream: String,
        record: JsonValue,
        time_extracted: DateTime<Utc>,
    },

    /// Bookmark checkpoint
    State { value: JsonValue },
}

impl Message {
    /// Schema message for a stream
    pub fn schema(stream: &StreamDefinition) -> Self {
        Self::Schema {
            stream: stream.name.clone(),
            schema: stream.schema.to_json_schema().to_json(),
            key_properties: stream.primary_keys.clone(),
            bookmark_properties: stream.replication_key.iter().cloned().collect(),
        }
    }

    /// Record message stamped with the current time
    pub fn record(stream: impl Into<String>, record: &Record) -> Self {
        Self::Record {
            stream: stream.into(),
            record: record.to_value(),
            time_extracted: Utc::now(),
        }
    }

    /// State message
    pub fn state(state: &State) -> Self {
        Self::State {
            value: state.to_value(),
        }
    }

    /// Stream name for schema and record messages
    pub fn stream(&self) -> Option<&str> {
        match self {
            Self::Schema { stream, .. } | Self::Record { stream, .. } => Some(stream),
            Self::State { .. } => None,
        }
    }
}
