//! Response decoder module
//!
//! # Overview
//!
//! Parses a JSON response body and locates the record array with a
//! declarative path such as `$.data[*]` or
//! `$.conversation_parts.conversation_parts[*]`. Records are yielded lazily.

mod decoders;
mod types;

pub use decoders::JsonDecoder;
pub use types::{RecordDecoder, Records};
