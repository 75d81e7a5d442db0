//! Execution engine module
//!
//! Main read loop and stream orchestration.
//!
//! # Overview
//!
//! The engine module provides:
//! - `SyncEngine` - Drives the traversal plan depth-first: every parent
//!   record's children run their full pagination before the next parent
//!   record is handled
//! - `SyncConfig` - Configuration for sync operations
//! - `SyncReport` / `SyncStats` - Per-stream outcome and counters
//!
//! Root streams are isolated from each other: a failure aborts the failing
//! root's subtree, is logged and reported, and the remaining roots still run.

mod types;

pub use types::{StreamResult, StreamStats, StreamStatus, SyncConfig, SyncReport, SyncStats};

use crate::config::TapConfig;
use crate::decode::RecordDecoder;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::output::{Emitter, Message};
use crate::pagination::{create_paginator, PaginationState};
use crate::partition::{ParentRouter, StreamGraph, SyncContext, SyncNode};
use crate::request::RequestBuilder;
use crate::schema::conform_record;
use crate::state::{BookmarkTracker, StateManager};
use crate::transform::PostProcessor;
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::{debug, error, info};

/// Error raised while syncing, tagged with the stream that raised it
struct StreamError {
    stream: String,
    error: Error,
}

type StreamOutcome = std::result::Result<(), StreamError>;

trait TagStream<T> {
    fn tag(self, stream: &str) -> std::result::Result<T, StreamError>;
}

impl<T> TagStream<T> for Result<T> {
    fn tag(self, stream: &str) -> std::result::Result<T, StreamError> {
        self.map_err(|error| StreamError {
            stream: stream.to_string(),
            error,
        })
    }
}

/// Mutable per-run bookkeeping
struct Run<'e> {
    emitter: &'e mut dyn Emitter,
    stats: SyncStats,
    start_timestamp: Option<i64>,
}

/// Sync engine for orchestrating data extraction
pub struct SyncEngine {
    client: HttpClient,
    state: StateManager,
    tap_config: TapConfig,
    config: SyncConfig,
}

impl SyncEngine {
    /// Create a new sync engine
    pub fn new(client: HttpClient, state: StateManager, tap_config: TapConfig) -> Self {
        Self {
            client,
            state,
            tap_config,
            config: SyncConfig::default(),
        }
    }

    /// Set sync configuration
    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the state manager
    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Sync the selected streams of a graph
    ///
    /// Configuration problems (unknown stream, malformed start date) fail
    /// before any request. Stream failures are collected in the report.
    pub async fn run(
        &self,
        graph: &StreamGraph<'_>,
        selected: &BTreeSet<String>,
        emitter: &mut dyn Emitter,
    ) -> Result<SyncReport> {
        let started = Instant::now();
        let plan = graph.plan(selected)?;
        let mut run = Run {
            emitter,
            stats: SyncStats::new(),
            start_timestamp: self.tap_config.start_timestamp()?,
        };
        let mut results = Vec::new();

        for root in &plan {
            let emitted = emitted_streams(root);
            for node in &emitted {
                run.emitter.emit(&Message::schema(node.stream))?;
            }

            let root_started = Instant::now();
            let outcome = self.sync_stream(root, &SyncContext::new(), &mut run).await;

            match outcome {
                Ok(()) => {
                    info!(
                        stream = %root.stream.name,
                        duration_ms = root_started.elapsed().as_millis() as u64,
                        "Stream tree completed"
                    );
                    results.extend(emitted.iter().map(|node| StreamResult {
                        stream: node.stream.name.clone(),
                        status: StreamStatus::Success,
                        error: None,
                    }));
                }
                Err(failure) => {
                    error!(stream = %failure.stream, error = %failure.error, "Stream failed");
                    results.extend(emitted.iter().map(|node| {
                        let message = if node.stream.name == failure.stream {
                            failure.error.to_string()
                        } else {
                            format!("aborted: stream '{}' failed", failure.stream)
                        };
                        StreamResult {
                            stream: node.stream.name.clone(),
                            status: StreamStatus::Failed,
                            error: Some(message),
                        }
                    }));
                    if !emitted.iter().any(|n| n.stream.name == failure.stream) {
                        results.push(StreamResult {
                            stream: failure.stream.clone(),
                            status: StreamStatus::Failed,
                            error: Some(failure.error.to_string()),
                        });
                    }
                }
            }

            run.emitter.emit(&Message::state(&self.state.snapshot().await))?;
        }

        run.stats.set_duration(started.elapsed().as_millis() as u64);
        Ok(SyncReport {
            stats: run.stats,
            results,
        })
    }

    /// Sync one stream under one context, including its children
    async fn sync_stream(
        &self,
        node: &SyncNode<'_>,
        context: &SyncContext,
        run: &mut Run<'_>,
    ) -> StreamOutcome {
        let stream = node.stream;
        let name = stream.name.as_str();
        let partition = stream.state_partition(context);
        let kind = stream.bookmark_kind();

        let start_value = match &stream.replication_key {
            Some(_) => {
                self.state
                    .starting_value(name, partition.as_ref(), run.start_timestamp, kind)
                    .await
            }
            None => None,
        };
        // Silently traversed parents never move their own bookmark
        let mut tracker = match &stream.replication_key {
            Some(key) if node.emit => Some(
                BookmarkTracker::new(name, key, kind, partition.clone())
                    .with_floor(start_value.clone()),
            ),
            _ => None,
        };

        let routers = node
            .children
            .iter()
            .map(|child| {
                child
                    .stream
                    .parent
                    .as_ref()
                    .map(|link| (child, ParentRouter::new(&child.stream.name, link)))
                    .ok_or_else(|| {
                        Error::config(format!("Stream '{}' has no parent link", child.stream.name))
                    })
            })
            .collect::<Result<Vec<_>>>()
            .tag(name)?;

        let paginator = create_paginator(&stream.pagination).tag(name)?;
        let builder = RequestBuilder::new(stream, &self.tap_config);
        let decoder = stream.decoder();
        let pipeline = stream.pipeline();
        let mut pagination = PaginationState::new();
        let mut token = paginator.initial_token();

        if context.is_empty() {
            info!(stream = name, start = ?start_value, "Starting stream");
        } else {
            debug!(stream = name, context = ?context, "Starting child fetch");
            run.stats.stream_mut(name).partitions += 1;
        }

        loop {
            let request = builder
                .build(context, start_value.as_ref(), token.as_ref())
                .tag(name)?;
            let body = self.client.execute(&request).await.tag(name)?;
            run.stats.stream_mut(name).pages += 1;

            let next = paginator
                .process_response(name, &body, &mut pagination)
                .tag(name)?;

            let mut page_records = 0u64;
            for raw in decoder.extract(body).tag(name)? {
                let raw = raw.tag(name)?;
                let Some(processed) = pipeline.post_process(raw, context).tag(name)? else {
                    run.stats.stream_mut(name).excluded += 1;
                    continue;
                };
                let record =
                    conform_record(name, &stream.schema, &stream.primary_keys, processed).tag(name)?;
                page_records += 1;

                if node.emit {
                    run.emitter.emit(&Message::record(name, &record)).tag(name)?;
                    run.stats.stream_mut(name).records += 1;
                    if let Some(tracker) = tracker.as_mut() {
                        tracker.observe(&record);
                    }
                }

                for (child, router) in &routers {
                    let child_context = router.context_for(&record).tag(&child.stream.name)?;
                    Box::pin(self.sync_stream(child, &child_context, run)).await?;
                }
            }
            pagination.add_fetched(page_records);
            debug!(
                stream = name,
                page = pagination.page,
                records = page_records,
                "Page processed"
            );

            if stream.is_sorted {
                self.checkpoint(&mut tracker, run).await.tag(name)?;
            }

            match next.token() {
                Some(next_token) => token = Some(next_token.clone()),
                None => break,
            }
        }

        self.checkpoint(&mut tracker, run).await.tag(name)?;

        if context.is_empty() {
            info!(
                stream = name,
                records = pagination.total_fetched,
                pages = pagination.page + 1,
                "Completed stream"
            );
        }
        Ok(())
    }

    /// Commit the pending bookmark, emitting STATE when configured
    async fn checkpoint(&self, tracker: &mut Option<BookmarkTracker>, run: &mut Run<'_>) -> Result<()> {
        let Some(tracker) = tracker.as_mut() else {
            return Ok(());
        };
        let changed = tracker.commit(&self.state).await?;
        if changed && self.config.emit_state_per_page {
            run.emitter.emit(&Message::state(&self.state.snapshot().await))?;
        }
        Ok(())
    }
}

/// Nodes of a subtree whose records are emitted, depth-first
fn emitted_streams<'n, 'a>(node: &'n SyncNode<'a>) -> Vec<&'n SyncNode<'a>> {
    let mut out = Vec::new();
    if node.emit {
        out.push(node);
    }
    for child in &node.children {
        out.extend(emitted_streams(child));
    }
    out
}
