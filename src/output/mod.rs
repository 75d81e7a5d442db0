//! Output module
//!
//! Singer-style JSON-lines messages written to stdout.
//!
//! # Overview
//!
//! - `SCHEMA` once per emitted stream, before its first record
//! - `RECORD` per conformed record
//! - `STATE` after bookmark checkpoints and at the end of a run
//!
//! Engine code talks to an [`Emitter`]; the CLI wires a [`JsonLinesWriter`]
//! over stdout, tests use a [`MessageCollector`].

mod emitter;
mod message;

pub use emitter::{Emitter, JsonLinesWriter, MessageCollector};
pub use message::Message;

#[cfg(test)]
mod tests;
