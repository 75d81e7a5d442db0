//! Request types

use crate::error::Result;
use crate::types::{JsonValue, Method};
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

/// Fixed page size for every endpoint
pub const PAGE_SIZE: u32 = 150;

/// One `{field, operator, value}` search predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPredicate {
    pub field: String,
    pub operator: String,
    pub value: JsonValue,
}

impl FilterPredicate {
    pub fn new(field: impl Into<String>, operator: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    /// `field > value`
    pub fn greater_than(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self::new(field, ">", value)
    }

    /// Render as a search query node
    pub fn to_value(&self) -> JsonValue {
        json!({"field": self.field, "operator": self.operator, "value": self.value})
    }
}

/// Compose the search `query` clause
///
/// - filters and a start predicate: `AND` of all of them
/// - several filters only: `AND` of the filters
/// - a single filter or the start predicate alone: that predicate as-is
/// - neither: no query
pub fn compose_query(filters: &[FilterPredicate], start: Option<FilterPredicate>) -> Option<JsonValue> {
    let mut predicates: Vec<JsonValue> = filters.iter().map(FilterPredicate::to_value).collect();
    predicates.extend(start.as_ref().map(FilterPredicate::to_value));

    match predicates.len() {
        0 => None,
        1 => predicates.pop(),
        _ => Some(json!({"operator": "AND", "value": predicates})),
    }
}

/// Fully built request, ready for the HTTP client
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,
    /// Path below the API root
    pub path: String,
    /// Query parameters in send order
    pub query: Vec<(String, String)>,
    /// JSON body (search endpoints only)
    pub body: Option<JsonValue>,
}

impl PreparedRequest {
    /// Query parameter by name
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Absolute URL under `base`, keeping any path prefix the base carries
    pub fn url(&self, base: &Url) -> Result<Url> {
        let mut root = base.clone();
        if !root.path().ends_with('/') {
            let prefix = format!("{}/", root.path());
            root.set_path(&prefix);
        }
        let mut url = root.join(self.path.trim_start_matches('/'))?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        Ok(url)
    }
}
