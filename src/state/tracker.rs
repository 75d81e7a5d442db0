//! Per-fetch bookmark tracking
//!
//! Holds the highest replication-key value seen since the last commit.
//! Values only reach the state manager through [`BookmarkTracker::commit`],
//! which the engine calls after a page (sorted streams) or after the whole
//! fetch (unsorted streams).

use super::manager::StateManager;
use super::types::{BookmarkKind, BookmarkValue};
use crate::error::Result;
use crate::partition::SyncContext;
use crate::schema::Record;

/// Pending bookmark for one stream/partition fetch
#[derive(Debug, Clone)]
pub struct BookmarkTracker {
    stream: String,
    replication_key: String,
    kind: BookmarkKind,
    partition: Option<SyncContext>,
    pending: Option<BookmarkValue>,
}

impl BookmarkTracker {
    pub fn new(
        stream: impl Into<String>,
        replication_key: impl Into<String>,
        kind: BookmarkKind,
        partition: Option<SyncContext>,
    ) -> Self {
        Self {
            stream: stream.into(),
            replication_key: replication_key.into(),
            kind,
            partition,
            pending: None,
        }
    }

    /// Start from a floor value, typically the fetch's starting value
    ///
    /// Keeps a committed bookmark from landing below the configured start.
    #[must_use]
    pub fn with_floor(mut self, floor: Option<BookmarkValue>) -> Self {
        if let Some(value) = floor {
            self.raise(value);
        }
        self
    }

    /// Observe an emitted record
    ///
    /// Records without a usable replication-key value leave the pending
    /// value untouched.
    pub fn observe(&mut self, record: &Record) {
        if let Some(value) = record
            .get(&self.replication_key)
            .and_then(BookmarkValue::from_json)
        {
            self.raise(value);
        }
    }

    fn raise(&mut self, value: BookmarkValue) {
        self.pending = Some(match self.pending.take() {
            Some(current) => current.max_of(value, self.kind),
            None => value,
        });
    }

    /// Highest value observed since the last commit
    pub fn pending(&self) -> Option<&BookmarkValue> {
        self.pending.as_ref()
    }

    /// Push the pending value to the state manager
    pub async fn commit(&mut self, state: &StateManager) -> Result<bool> {
        match self.pending.take() {
            Some(value) => {
                state
                    .advance(
                        &self.stream,
                        self.partition.as_ref(),
                        &self.replication_key,
                        value,
                        self.kind,
                    )
                    .await
            }
            None => Ok(false),
        }
    }
}
