//! State management module
//!
//! Handles bookmark tracking, checkpointing, and resumability.
//! State is persisted between sync runs to enable incremental syncs.
//!
//! # Overview
//!
//! The state module provides:
//! - `State` - Bookmarks per stream and per partition
//! - `StateManager` - File-based state persistence, starting values and
//!   monotonic bookmark advances
//! - `BookmarkTracker` - Pending maximum between commits

mod manager;
mod tracker;
mod types;

pub use manager::StateManager;
pub use tracker::BookmarkTracker;
pub use types::{BookmarkKind, BookmarkValue, PartitionState, State, StreamState};
