//! Stream schemas
//!
//! Declarative field descriptions for each stream, their JSON Schema
//! rendering, and record conformance.
//!
//! # Features
//!
//! - **Declarative**: Schemas are immutable data built once per process
//! - **Nullable**: Every field accepts null
//! - **Conformance**: Raw objects become `Record`s only after type checks
//! - **Nested Object Support**: Declared objects are checked recursively

mod conform;
mod model;
mod types;

pub use conform::{conform_record, Record};
pub use model::{Field, FieldType, Schema};
pub use types::{JsonSchema, JsonType, JsonTypeOrArray, SchemaProperty};
