//! Partition routing module
//!
//! Parent/child streams: sync contexts, context derivation, and the stream
//! graph that decides traversal order.
//!
//! # Overview
//!
//! A child stream (such as `conversation_parts`) cannot be fetched on its
//! own. For every parent record the engine derives a [`SyncContext`] through
//! a [`ParentRouter`] and runs the child's full pagination under it before
//! moving to the next parent record.

mod graph;
mod routers;
mod types;

pub use graph::{StreamGraph, SyncNode};
pub use routers::{extract_field, ParentRouter};
pub use types::{ContextField, ParentLink, SyncContext};
