//! Engine types
//!
//! Configuration and statistics for the sync engine.

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// Configuration for sync operation
#[derive(Debug, Clone, Default)]
pub struct SyncConfig {
    /// Emit a STATE message after every bookmark checkpoint
    pub emit_state_per_page: bool,
}

impl SyncConfig {
    /// Create a new sync config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit state after each page
    #[must_use]
    pub fn with_state_per_page(mut self, emit: bool) -> Self {
        self.emit_state_per_page = emit;
        self
    }
}

/// Counters for one stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreamStats {
    /// Records emitted
    pub records: u64,
    /// Records dropped by post-processing
    pub excluded: u64,
    /// Pages fetched
    pub pages: u64,
    /// Child fetches (one per parent context)
    pub partitions: u64,
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncStats {
    /// Per-stream counters, keyed by stream name
    pub streams: BTreeMap<String, StreamStats>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters for a stream, creating them if needed
    pub fn stream_mut(&mut self, stream: &str) -> &mut StreamStats {
        self.streams.entry(stream.to_string()).or_default()
    }

    /// Counters for a stream
    pub fn stream(&self, stream: &str) -> Option<&StreamStats> {
        self.streams.get(stream)
    }

    /// Records emitted across all streams
    pub fn records_synced(&self) -> u64 {
        self.streams.values().map(|s| s.records).sum()
    }

    /// Records excluded across all streams
    pub fn records_excluded(&self) -> u64 {
        self.streams.values().map(|s| s.excluded).sum()
    }

    /// Pages fetched across all streams
    pub fn pages_fetched(&self) -> u64 {
        self.streams.values().map(|s| s.pages).sum()
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

/// Final status of one stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StreamStatus {
    Success,
    Failed,
}

/// Outcome of one stream in a run
#[derive(Debug, Clone, Serialize)]
pub struct StreamResult {
    pub stream: String,
    pub status: StreamStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything a run produced besides its messages
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub stats: SyncStats,
    pub results: Vec<StreamResult>,
}

impl SyncReport {
    /// Names of the streams that failed
    pub fn failed_streams(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|r| r.status == StreamStatus::Failed)
            .map(|r| r.stream.clone())
            .collect()
    }

    /// Whether every stream succeeded
    pub fn is_success(&self) -> bool {
        self.results.iter().all(|r| r.status == StreamStatus::Success)
    }

    /// `SyncFailed` naming every failed stream, if any
    pub fn into_result(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::SyncFailed {
                streams: self.failed_streams(),
            })
        }
    }
}
