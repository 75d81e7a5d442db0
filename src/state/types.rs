//! State types for tracking sync progress
//!
//! These types are serialized to JSON and persisted between runs:
//!
//! ```json
//! {"bookmarks": {"conversations": {
//!     "replication_key": "updated_at",
//!     "replication_key_value": 1700000000,
//!     "partitions": [{"context": {"conversation_id": "1"}, "replication_key": "updated_at", "replication_key_value": 1700000000}]
//! }}}
//! ```

use crate::config::parse_datetime;
use crate::partition::SyncContext;
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

// ============================================================================
// Bookmark values
// ============================================================================

/// How bookmark values of a stream compare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookmarkKind {
    /// Integer-typed replication key (unix seconds)
    #[default]
    Numeric,
    /// String-typed replication key
    Lexicographic,
}

/// Furthest replication-key value observed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookmarkValue {
    Integer(i64),
    Text(String),
}

impl BookmarkValue {
    /// Read a bookmark from a record field; null and non-scalars give `None`
    pub fn from_json(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .map(BookmarkValue::Integer),
            JsonValue::String(s) => Some(BookmarkValue::Text(s.clone())),
            _ => None,
        }
    }

    /// Numeric view: integers as-is, strings as unix seconds or datetimes
    pub fn as_unix(&self) -> Option<i64> {
        match self {
            BookmarkValue::Integer(i) => Some(*i),
            BookmarkValue::Text(s) => s.parse().ok().or_else(|| parse_datetime(s).ok()),
        }
    }

    /// Compare under a stream's rule
    ///
    /// Values that cannot be read numerically sort before everything else in
    /// a numeric stream.
    pub fn compare(&self, other: &Self, kind: BookmarkKind) -> Ordering {
        match kind {
            BookmarkKind::Numeric => self.as_unix().cmp(&other.as_unix()),
            BookmarkKind::Lexicographic => self.to_string().cmp(&other.to_string()),
        }
    }

    /// The greater of two values (ties keep `other`)
    #[must_use]
    pub fn max_of(self, other: Self, kind: BookmarkKind) -> Self {
        if self.compare(&other, kind) == Ordering::Greater {
            self
        } else {
            other
        }
    }

    /// Render as a JSON value
    pub fn to_value(&self) -> JsonValue {
        match self {
            BookmarkValue::Integer(i) => JsonValue::from(*i),
            BookmarkValue::Text(s) => JsonValue::from(s.as_str()),
        }
    }
}

impl std::fmt::Display for BookmarkValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookmarkValue::Integer(i) => write!(f, "{i}"),
            BookmarkValue::Text(s) => write!(f, "{s}"),
        }
    }
}

// ============================================================================
// Persisted state
// ============================================================================

/// Complete state for the tap
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Per-stream bookmarks
    #[serde(default)]
    pub bookmarks: BTreeMap<String, StreamState>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get state for a stream
    pub fn get_stream(&self, stream: &str) -> Option<&StreamState> {
        self.bookmarks.get(stream)
    }

    /// Get mutable state for a stream, creating if needed
    pub fn get_stream_mut(&mut self, stream: &str) -> &mut StreamState {
        self.bookmarks.entry(stream.to_string()).or_default()
    }

    /// Bookmark for a stream, or for one of its partitions
    pub fn bookmark(&self, stream: &str, partition: Option<&SyncContext>) -> Option<&BookmarkValue> {
        let stream_state = self.get_stream(stream)?;
        match partition {
            None => stream_state.replication_key_value.as_ref(),
            Some(context) => stream_state
                .get_partition(context)?
                .replication_key_value
                .as_ref(),
        }
    }

    /// Render as a JSON value
    pub fn to_value(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// State for a single stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamState {
    /// Replication key the stream-level bookmark refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key: Option<String>,

    /// Stream-level bookmark
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key_value: Option<BookmarkValue>,

    /// Per-partition bookmarks (child streams partitioned by context)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partitions: Vec<PartitionState>,
}

impl StreamState {
    /// Create a new empty stream state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get partition state
    pub fn get_partition(&self, context: &SyncContext) -> Option<&PartitionState> {
        self.partitions.iter().find(|p| &p.context == context)
    }

    /// Get mutable partition state, creating if needed
    pub fn get_partition_mut(&mut self, context: &SyncContext) -> &mut PartitionState {
        let index = match self.partitions.iter().position(|p| &p.context == context) {
            Some(i) => i,
            None => {
                self.partitions.push(PartitionState::new(context.clone()));
                self.partitions.len() - 1
            }
        };
        &mut self.partitions[index]
    }
}

/// State for a single partition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartitionState {
    /// Sync context identifying the partition
    pub context: SyncContext,

    /// Replication key the bookmark refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key: Option<String>,

    /// Partition bookmark
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key_value: Option<BookmarkValue>,
}

impl PartitionState {
    /// Create a new empty partition state
    pub fn new(context: SyncContext) -> Self {
        Self {
            context,
            replication_key: None,
            replication_key_value: None,
        }
    }
}
