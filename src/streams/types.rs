//! Stream definition types

use crate::decode::JsonDecoder;
use crate::pagination::PaginationConfig;
use crate::partition::{ParentLink, SyncContext};
use crate::schema::{FieldType, Schema};
use crate::state::BookmarkKind;
use crate::transform::{Pipeline, PostProcessStep};
use crate::types::{JsonValue, Method, ReplicationMethod};
use serde::{Deserialize, Serialize};

/// Everything the engine needs to know about one stream
///
/// Built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct StreamDefinition {
    /// Stream name, also the catalog id
    pub name: String,

    /// Declared fields
    pub schema: Schema,

    /// Primary key fields (never empty)
    pub primary_keys: Vec<String>,

    /// Field whose value drives incremental sync
    pub replication_key: Option<String>,

    /// Parent stream supplying the sync context
    pub parent: Option<ParentLink>,

    /// HTTP method of the endpoint
    pub method: Method,

    /// Endpoint path, may contain `{context_key}` placeholders
    pub path: String,

    /// Location of the records in the response body
    pub record_path: String,

    /// Pagination strategy
    pub pagination: PaginationConfig,

    /// Steps run on each raw record before conformance
    pub post_process: Vec<PostProcessStep>,

    /// Whether the endpoint returns records ordered by the replication key
    pub is_sorted: bool,

    /// Context keys that identify a state partition
    ///
    /// `None` keeps one bookmark per full context; `Some(vec![])` keeps a
    /// single stream-level bookmark shared by all contexts.
    pub state_partitioning_keys: Option<Vec<String>>,
}

impl StreamDefinition {
    /// A GET listing of `path` with records under `record_path`
    pub fn new(name: impl Into<String>, path: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            primary_keys: vec!["id".to_string()],
            replication_key: None,
            parent: None,
            method: Method::GET,
            path: path.into(),
            record_path: "$.data[*]".to_string(),
            pagination: PaginationConfig::default(),
            post_process: Vec::new(),
            is_sorted: false,
            state_partitioning_keys: None,
        }
    }

    /// Use POST with a search body; search results come back sorted
    #[must_use]
    pub fn search(mut self) -> Self {
        self.method = Method::POST;
        self.is_sorted = true;
        self
    }

    #[must_use]
    pub fn with_record_path(mut self, path: impl Into<String>) -> Self {
        self.record_path = path.into();
        self
    }

    #[must_use]
    pub fn with_replication_key(mut self, key: impl Into<String>) -> Self {
        self.replication_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: ParentLink) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    #[must_use]
    pub fn with_step(mut self, step: PostProcessStep) -> Self {
        self.post_process.push(step);
        self
    }

    #[must_use]
    pub fn with_primary_keys(mut self, keys: &[&str]) -> Self {
        self.primary_keys = keys.iter().map(|k| (*k).to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_state_partitioning_keys(mut self, keys: Vec<String>) -> Self {
        self.state_partitioning_keys = Some(keys);
        self
    }

    /// Full table without a replication key, incremental with one
    pub fn replication_method(&self) -> ReplicationMethod {
        if self.replication_key.is_some() {
            ReplicationMethod::Incremental
        } else {
            ReplicationMethod::FullTable
        }
    }

    /// How bookmark values compare, from the replication key's declared type
    pub fn bookmark_kind(&self) -> BookmarkKind {
        let declared = self
            .replication_key
            .as_deref()
            .and_then(|key| self.schema.field(key))
            .map(|field| &field.field_type);
        match declared {
            Some(FieldType::String) => BookmarkKind::Lexicographic,
            _ => BookmarkKind::Numeric,
        }
    }

    /// State partition a sync context writes its bookmark to
    ///
    /// `None` for root streams and for children configured with a
    /// stream-level bookmark.
    pub fn state_partition(&self, context: &SyncContext) -> Option<SyncContext> {
        if context.is_empty() {
            return None;
        }
        let partition = match &self.state_partitioning_keys {
            Some(keys) => context.project(keys),
            None => context.clone(),
        };
        (!partition.is_empty()).then_some(partition)
    }

    /// Post-processing pipeline for this stream
    pub fn pipeline(&self) -> Pipeline<'_> {
        Pipeline::new(&self.name, &self.post_process)
    }

    /// Record decoder for this stream
    pub fn decoder(&self) -> JsonDecoder {
        JsonDecoder::with_path(&self.record_path)
    }

    /// Catalog entry for discovery
    pub fn catalog_entry(&self) -> CatalogStream {
        CatalogStream {
            tap_stream_id: self.name.clone(),
            stream: self.name.clone(),
            schema: self.schema.to_json_schema().to_json(),
            key_properties: self.primary_keys.clone(),
            replication_key: self.replication_key.clone(),
            replication_method: self.replication_method(),
            parent_stream: self.parent.as_ref().map(|p| p.stream.clone()),
        }
    }
}

/// Streams offered by the tap
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub streams: Vec<CatalogStream>,
}

/// Stream in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogStream {
    pub tap_stream_id: String,

    pub stream: String,

    /// JSON schema for the stream
    pub schema: JsonValue,

    pub key_properties: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key: Option<String>,

    pub replication_method: ReplicationMethod,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_stream: Option<String>,
}
