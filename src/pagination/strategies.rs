//! Pagination strategy implementations
//!
//! Each strategy handles a specific pagination pattern. An absent or null
//! `pages.next` is the only termination signal for all of them.

use super::types::{cursor_string, pages_next, PageToken, PaginationConfig, Paginator};
use crate::error::{Error, Result};
use jsonpath_rust::JsonPath;
use serde_json::Value;
use url::Url;

// ============================================================================
// Offset Cursor Pagination
// ============================================================================

/// Cursor embedded at `pages.next.starting_after`
///
/// ```json
/// {"pages": {"next": {"starting_after": "WzE3MDAwMDAwMDAsMTJd"}}}
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetCursorPaginator;

impl OffsetCursorPaginator {
    /// Create a new offset cursor paginator
    pub fn new() -> Self {
        Self
    }
}

impl Paginator for OffsetCursorPaginator {
    fn has_more(&self, body: &Value) -> bool {
        pages_next(body).is_some()
    }

    fn next_token(&self, body: &Value) -> Result<Option<PageToken>> {
        Ok(pages_next(body)
            .and_then(|next| next.get("starting_after"))
            .and_then(cursor_string)
            .map(PageToken::Cursor))
    }
}

// ============================================================================
// JSONPath Cursor Pagination
// ============================================================================

/// Same contract as [`OffsetCursorPaginator`], with the cursor located by a
/// JSONPath query
#[derive(Debug, Clone)]
pub struct JsonPathCursorPaginator {
    path: String,
}

impl JsonPathCursorPaginator {
    /// Create a paginator, validating the path up front
    pub fn new(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        compile(&path)?;
        Ok(Self { path })
    }

    /// The configured JSONPath
    pub fn path(&self) -> &str {
        &self.path
    }
}

fn compile(path: &str) -> Result<JsonPath> {
    JsonPath::try_from(path).map_err(|e| Error::json_path(format!("Invalid JSONPath '{path}': {e}")))
}

impl Paginator for JsonPathCursorPaginator {
    fn has_more(&self, body: &Value) -> bool {
        pages_next(body).is_some()
    }

    fn next_token(&self, body: &Value) -> Result<Option<PageToken>> {
        let found = match compile(&self.path)?.find(body) {
            Value::Array(values) => values.into_iter().find(|v| !v.is_null()),
            Value::Null => None,
            other => Some(other),
        };
        Ok(found.as_ref().and_then(cursor_string).map(PageToken::Cursor))
    }
}

// ============================================================================
// HATEOAS Pagination
// ============================================================================

/// `pages.next` is the full URL of the next page
///
/// ```json
/// {"pages": {"next": "https://api.intercom.io/articles?page=2&per_page=150"}}
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HateoasPaginator;

impl HateoasPaginator {
    /// Create a new HATEOAS paginator
    pub fn new() -> Self {
        Self
    }
}

impl Paginator for HateoasPaginator {
    fn has_more(&self, body: &Value) -> bool {
        pages_next(body).is_some()
    }

    fn next_token(&self, body: &Value) -> Result<Option<PageToken>> {
        match pages_next(body).and_then(Value::as_str) {
            Some(link) => Ok(Some(PageToken::Link(Url::parse(link)?))),
            None => Ok(None),
        }
    }
}

// ============================================================================
// Single Request
// ============================================================================

/// Single-object endpoints: exactly one request
#[derive(Debug, Clone, Copy, Default)]
pub struct SinglePaginator;

impl SinglePaginator {
    /// Create a new single-request paginator
    pub fn new() -> Self {
        Self
    }
}

impl Paginator for SinglePaginator {
    fn has_more(&self, _body: &Value) -> bool {
        false
    }

    fn next_token(&self, _body: &Value) -> Result<Option<PageToken>> {
        Ok(None)
    }
}

// ============================================================================
// Factory
// ============================================================================

/// Create a paginator from config
pub fn create_paginator(config: &PaginationConfig) -> Result<Box<dyn Paginator>> {
    Ok(match config {
        PaginationConfig::OffsetCursor => Box::new(OffsetCursorPaginator::new()),
        PaginationConfig::JsonPathCursor { path } => Box::new(JsonPathCursorPaginator::new(path)?),
        PaginationConfig::Hateoas => Box::new(HateoasPaginator::new()),
        PaginationConfig::Single => Box::new(SinglePaginator::new()),
    })
}
