//! # tap-intercom
//!
//! Extracts Intercom data (conversations, conversation parts, contacts,
//! articles, admins, tags, teams) as Singer-style JSON lines.
//!
//! ## Features
//!
//! - **Declarative streams**: every stream is a [`streams::StreamDefinition`]
//!   value (endpoint, schema, pagination, replication key, parent link)
//! - **Search pagination**: cursor, JSONPath cursor and HATEOAS link strategies
//! - **Incremental sync**: monotonic bookmarks per stream and partition
//! - **Parent/child streams**: child endpoints run once per parent record,
//!   depth-first
//! - **Retry and rate limiting**: exponential backoff with `Retry-After`
//!   support and a client-side request budget
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tap_intercom::config::TapConfig;
//! use tap_intercom::output::JsonLinesWriter;
//! use tap_intercom::state::StateManager;
//! use tap_intercom::tap::{Connector, IntercomTap, ReadOptions};
//!
//! #[tokio::main]
//! async fn main() -> tap_intercom::Result<()> {
//!     let config = TapConfig::from_file("config.json")?;
//!     let tap = IntercomTap::new();
//!
//!     let status = tap.check(&config).await?;
//!     let catalog = tap.discover(&config).await?;
//!
//!     let mut out = JsonLinesWriter::stdout(false);
//!     let options = ReadOptions::default().with_streams(["conversations"]);
//!     let report = tap
//!         .read(&config, StateManager::new("state.json"), &options, &mut out)
//!         .await?;
//!     report.into_result()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Connector                              │
//! │  spec() → ConnectorSpec  check() → CheckResult  discover()      │
//! │  read(config, state, options, emitter) → SyncReport             │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │ Streams  │   HTTP    │   Paginate    │ Partition │   Output    │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Registry │ GET/POST  │ Offset cursor │ Graph     │ SCHEMA      │
//! │ Schemas  │ Retry     │ JSONPath      │ Parent    │ RECORD      │
//! │ Requests │ Rate Limit│ HATEOAS       │ Context   │ STATE       │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Tap configuration
pub mod config;

/// HTTP client with retry and rate limiting
pub mod http;

/// Request construction for listing and search endpoints
pub mod request;

/// Pagination strategies
pub mod pagination;

/// Parent/child stream graph and sync contexts
pub mod partition;

/// Record extraction from response bodies
pub mod decode;

/// Per-record post-processing
pub mod transform;

/// Declarative schemas and record conformance
pub mod schema;

/// Stream definitions and registry
pub mod streams;

/// Bookmark state
pub mod state;

/// Singer message output
pub mod output;

/// Main execution engine
pub mod engine;

/// Connector trait and the Intercom tap
pub mod tap;

/// Path placeholder rendering
pub mod template;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use tap::{Connector, IntercomTap};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
