//! State manager implementation
//!
//! Provides file-based state persistence with atomic writes, plus the two
//! bookmark operations the sync needs: the starting value for a fetch and a
//! monotonic advance.

use super::types::{BookmarkKind, BookmarkValue, State};
use crate::error::{Error, Result};
use crate::partition::SyncContext;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// State manager for persisting and loading state
#[derive(Debug)]
pub struct StateManager {
    /// Path to the state file
    path: PathBuf,
    /// Current state (cached)
    state: Arc<RwLock<State>>,
    /// Whether to save on every committed bookmark
    auto_save: bool,
}

impl StateManager {
    /// Create a new state manager with the given path
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            state: Arc::new(RwLock::new(State::new())),
            auto_save: true,
        }
    }

    /// Create an in-memory state manager (no file persistence)
    pub fn in_memory() -> Self {
        Self::with_state(State::new())
    }

    /// Create an in-memory state manager seeded with a state
    pub fn with_state(state: State) -> Self {
        Self {
            path: PathBuf::new(),
            state: Arc::new(RwLock::new(state)),
            auto_save: false,
        }
    }

    /// Create a state manager from a file, loading existing state if present
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| Error::state(format!("Failed to read state file: {e}")))?;
            if contents.trim().is_empty() {
                State::new()
            } else {
                serde_json::from_str(&contents)
                    .map_err(|e| Error::state(format!("Failed to parse state file: {e}")))?
            }
        } else {
            State::new()
        };

        Ok(Self {
            path,
            state: Arc::new(RwLock::new(state)),
            auto_save: true,
        })
    }

    /// Create a state manager from inline JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let state: State = serde_json::from_str(json)
            .map_err(|e| Error::state(format!("Failed to parse state JSON: {e}")))?;
        Ok(Self::with_state(state))
    }

    /// Save current state to file
    ///
    /// Writes a sibling temp file and renames it over the target, so a
    /// reader never sees a partial document.
    pub async fn save(&self) -> Result<()> {
        if self.is_in_memory() {
            return Ok(());
        }

        let contents = self.to_json_pretty().await?;
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::state(format!("Failed to write state file: {e}")))?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::state(format!("Failed to rename state file: {e}")))?;

        Ok(())
    }

    /// Get a read lock on the current state
    pub async fn state(&self) -> tokio::sync::RwLockReadGuard<'_, State> {
        self.state.read().await
    }

    /// Snapshot of the current state
    pub async fn snapshot(&self) -> State {
        self.state.read().await.clone()
    }

    /// Export state as JSON string
    pub async fn to_json(&self) -> Result<String> {
        let state = self.state.read().await;
        serde_json::to_string(&*state)
            .map_err(|e| Error::state(format!("Failed to serialize state: {e}")))
    }

    /// Export state as pretty-printed JSON string
    pub async fn to_json_pretty(&self) -> Result<String> {
        let state = self.state.read().await;
        serde_json::to_string_pretty(&*state)
            .map_err(|e| Error::state(format!("Failed to serialize state: {e}")))
    }

    /// Value a fetch starts from
    ///
    /// The stored bookmark, raised to `start` when the configured start date
    /// is later. With neither, the fetch is unbounded.
    pub async fn starting_value(
        &self,
        stream: &str,
        partition: Option<&SyncContext>,
        start: Option<i64>,
        kind: BookmarkKind,
    ) -> Option<BookmarkValue> {
        let stored = self.state.read().await.bookmark(stream, partition).cloned();
        let start = start.map(BookmarkValue::Integer);
        match (stored, start) {
            (Some(stored), Some(start)) => Some(stored.max_of(start, kind)),
            (stored, start) => stored.or(start),
        }
    }

    /// Commit a bookmark if it does not move backwards
    ///
    /// Returns whether the stored value changed.
    pub async fn advance(
        &self,
        stream: &str,
        partition: Option<&SyncContext>,
        replication_key: &str,
        value: BookmarkValue,
        kind: BookmarkKind,
    ) -> Result<bool> {
        let changed = {
            let mut state = self.state.write().await;
            let stream_state = state.get_stream_mut(stream);
            let (key_slot, value_slot) = match partition {
                None => (
                    &mut stream_state.replication_key,
                    &mut stream_state.replication_key_value,
                ),
                Some(context) => {
                    let p = stream_state.get_partition_mut(context);
                    (&mut p.replication_key, &mut p.replication_key_value)
                }
            };

            let regresses = value_slot
                .as_ref()
                .is_some_and(|current| value.compare(current, kind).is_lt());
            if regresses {
                false
            } else {
                let changed = value_slot.as_ref() != Some(&value);
                debug!(stream, bookmark = %value, "Advancing bookmark");
                *key_slot = Some(replication_key.to_string());
                *value_slot = Some(value);
                changed
            }
        };

        if changed && self.auto_save {
            self.save().await?;
        }

        Ok(changed)
    }

    /// Get the state file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if using in-memory mode
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str().is_empty()
    }
}

impl Clone for StateManager {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            state: Arc::clone(&self.state),
            auto_save: self.auto_save,
        }
    }
}
