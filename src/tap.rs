//! Tap entry points
//!
//! Defines the `Connector` trait (spec, check, discover, read) and the
//! Intercom implementation backed by the static stream registry.

use crate::config::TapConfig;
use crate::engine::{SyncConfig, SyncEngine, SyncReport};
use crate::error::Result;
use crate::http::HttpClient;
use crate::output::Emitter;
use crate::partition::StreamGraph;
use crate::state::StateManager;
use crate::streams::{Catalog, StreamRegistry};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{info, warn};

// ============================================================================
// Connector Spec
// ============================================================================

/// Connector specification returned by spec()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorSpec {
    /// Connector name
    pub name: String,

    /// Human-readable title
    pub title: String,

    /// Description
    pub description: Option<String>,

    /// JSON schema of the accepted configuration
    pub config_schema: Value,
}

// ============================================================================
// Check Result
// ============================================================================

/// Result of a connection check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Whether the check succeeded
    pub success: bool,

    /// Error message if failed
    pub message: Option<String>,
}

impl CheckResult {
    /// Create a successful check result
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// Create a failed check result
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

// ============================================================================
// Read options
// ============================================================================

/// Options for a read
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Streams to emit; `None` or empty selects every stream
    pub streams: Option<Vec<String>>,

    /// Emit a STATE message after every bookmark checkpoint
    pub state_per_page: bool,
}

impl ReadOptions {
    /// Select streams by name
    #[must_use]
    pub fn with_streams<I, S>(mut self, streams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.streams = Some(streams.into_iter().map(Into::into).collect());
        self
    }

    /// Emit state after each page
    #[must_use]
    pub fn with_state_per_page(mut self, emit: bool) -> Self {
        self.state_per_page = emit;
        self
    }
}

// ============================================================================
// Connector Trait
// ============================================================================

/// Core operations every tap exposes
#[async_trait]
pub trait Connector: Send + Sync {
    /// Returns the connector specification
    fn spec(&self) -> ConnectorSpec;

    /// Tests if credentials and configuration are valid
    async fn check(&self, config: &TapConfig) -> Result<CheckResult>;

    /// Lists available streams
    async fn discover(&self, config: &TapConfig) -> Result<Catalog>;

    /// Reads the selected streams, writing messages to `emitter`
    ///
    /// Bookmarks are read from and committed to `state`.
    async fn read(
        &self,
        config: &TapConfig,
        state: StateManager,
        options: &ReadOptions,
        emitter: &mut dyn Emitter,
    ) -> Result<SyncReport>;
}

// ============================================================================
// Intercom
// ============================================================================

/// The Intercom tap
#[derive(Debug, Clone, Copy)]
pub struct IntercomTap {
    registry: &'static StreamRegistry,
}

impl Default for IntercomTap {
    fn default() -> Self {
        Self::new()
    }
}

impl IntercomTap {
    /// Tap over the built-in streams
    pub fn new() -> Self {
        Self {
            registry: StreamRegistry::global(),
        }
    }

    /// The stream registry
    pub fn registry(&self) -> &'static StreamRegistry {
        self.registry
    }

    fn selection(&self, options: &ReadOptions) -> BTreeSet<String> {
        match &options.streams {
            Some(streams) if !streams.is_empty() => streams.iter().cloned().collect(),
            _ => self
                .registry
                .names()
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[async_trait]
impl Connector for IntercomTap {
    fn spec(&self) -> ConnectorSpec {
        ConnectorSpec {
            name: crate::NAME.to_string(),
            title: "Intercom".to_string(),
            description: Some(
                "Extracts conversations, contacts, articles and workspace metadata from the Intercom API"
                    .to_string(),
            ),
            config_schema: TapConfig::json_schema(),
        }
    }

    async fn check(&self, config: &TapConfig) -> Result<CheckResult> {
        config.validate()?;
        let client = HttpClient::from_tap_config(config)?;

        match client.get_json("/admins").await {
            Ok(_) => {
                info!("Connection check succeeded");
                Ok(CheckResult::success())
            }
            Err(e) => {
                warn!(error = %e, "Connection check failed");
                Ok(CheckResult::failure(e.to_string()))
            }
        }
    }

    async fn discover(&self, _config: &TapConfig) -> Result<Catalog> {
        Ok(self.registry.catalog())
    }

    async fn read(
        &self,
        config: &TapConfig,
        state: StateManager,
        options: &ReadOptions,
        emitter: &mut dyn Emitter,
    ) -> Result<SyncReport> {
        config.validate()?;
        self.registry.validate_filters(config)?;

        let selected = self.selection(options);
        let graph = StreamGraph::new(self.registry.all())?;
        graph.plan(&selected)?;

        let client = HttpClient::from_tap_config(config)?;
        let engine = SyncEngine::new(client, state, config.clone())
            .with_config(SyncConfig::new().with_state_per_page(options.state_per_page));

        info!(streams = ?selected, "Starting sync");
        let report = engine.run(&graph, &selected, emitter).await?;
        engine.state().save().await?;

        info!(
            records = report.stats.records_synced(),
            pages = report.stats.pages_fetched(),
            duration_ms = report.stats.duration_ms,
            failed = ?report.failed_streams(),
            "Sync finished"
        );
        Ok(report)
    }
}
