//! Request builder
//!
//! Turns (stream, config, context, start value, page token) into a
//! [`PreparedRequest`]. GET listings carry their paging in the query string;
//! search endpoints carry sort, filter and paging in a JSON body.

use super::types::{compose_query, FilterPredicate, PreparedRequest, PAGE_SIZE};
use crate::config::{parse_datetime, TapConfig};
use crate::error::Result;
use crate::pagination::PageToken;
use crate::partition::SyncContext;
use crate::state::BookmarkValue;
use crate::streams::StreamDefinition;
use crate::template::render_path;
use crate::types::{JsonObject, JsonValue, Method};
use serde_json::json;

/// Sort field used when a search stream has no replication key
pub const DEFAULT_SORT_FIELD: &str = "updated_at";

/// Builds requests for one stream
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
    stream: &'a StreamDefinition,
    filters: &'a [FilterPredicate],
}

impl<'a> RequestBuilder<'a> {
    pub fn new(stream: &'a StreamDefinition, config: &'a TapConfig) -> Self {
        Self {
            stream,
            filters: config.filters_for(&stream.name),
        }
    }

    /// Build the request for one page
    pub fn build(
        &self,
        context: &SyncContext,
        start_value: Option<&BookmarkValue>,
        token: Option<&PageToken>,
    ) -> Result<PreparedRequest> {
        let path = render_path(&self.stream.path, &self.stream.name, context)?;

        match self.stream.method {
            Method::GET => Ok(PreparedRequest {
                method: Method::GET,
                path,
                query: list_params(token),
                body: None,
            }),
            Method::POST => Ok(PreparedRequest {
                method: Method::POST,
                path,
                query: Vec::new(),
                body: Some(self.search_body(start_value, token)?),
            }),
        }
    }

    fn search_body(&self, start_value: Option<&BookmarkValue>, token: Option<&PageToken>) -> Result<JsonValue> {
        let key = self
            .stream
            .replication_key
            .as_deref()
            .unwrap_or(DEFAULT_SORT_FIELD);

        let mut body = JsonObject::new();
        body.insert("sort".into(), json!({"field": key, "order": "ascending"}));

        let start = start_value
            .map(start_value_to_unix)
            .transpose()?
            .map(|ts| FilterPredicate::greater_than(key, ts));
        if let Some(query) = compose_query(self.filters, start) {
            body.insert("query".into(), query);
        }

        if let Some(token) = token {
            body.insert(
                "pagination".into(),
                json!({"per_page": PAGE_SIZE, "starting_after": token.to_string()}),
            );
        }

        Ok(JsonValue::Object(body))
    }
}

/// Query parameters for a GET listing
///
/// A next-page link already encodes everything, so its query string
/// replaces the defaults instead of being merged into them.
fn list_params(token: Option<&PageToken>) -> Vec<(String, String)> {
    match token {
        Some(PageToken::Link(url)) => url.query_pairs().into_owned().collect(),
        Some(PageToken::Cursor(cursor)) => vec![
            ("per_page".into(), PAGE_SIZE.to_string()),
            ("starting_after".into(), cursor.clone()),
        ],
        None => vec![("per_page".into(), PAGE_SIZE.to_string())],
    }
}

/// Normalize a start value to unix seconds
///
/// Integers pass through; strings must match `%Y-%m-%dT%H:%M:%SZ`.
pub fn start_value_to_unix(value: &BookmarkValue) -> Result<i64> {
    match value {
        BookmarkValue::Integer(ts) => Ok(*ts),
        BookmarkValue::Text(s) => parse_datetime(s),
    }
}
