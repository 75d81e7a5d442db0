//! Tap configuration
//!
//! The configuration is read once (file or inline JSON), validated, and then
//! passed by reference to every component that needs it. Nothing reads it
//! through globals.

use crate::error::{Error, Result};
use crate::request::FilterPredicate;
use crate::types::OptionStringExt;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;

/// Default Intercom API root
pub const DEFAULT_API_URL: &str = "https://api.intercom.io";

/// Pinned Intercom API version sent with every request
pub const API_VERSION: &str = "2.11";

/// The only accepted layout for date-time start values
pub const START_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Start date as it may appear in config or state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StartDate {
    /// Unix timestamp in seconds
    Timestamp(i64),
    /// `%Y-%m-%dT%H:%M:%SZ` string
    DateTime(String),
}

impl StartDate {
    /// Normalize to unix seconds
    pub fn to_unix(&self) -> Result<i64> {
        match self {
            StartDate::Timestamp(ts) => Ok(*ts),
            StartDate::DateTime(s) => parse_datetime(s),
        }
    }
}

/// Parse a `%Y-%m-%dT%H:%M:%SZ` string (UTC) into unix seconds
pub fn parse_datetime(s: &str) -> Result<i64> {
    NaiveDateTime::parse_from_str(s, START_DATE_FORMAT)
        .map(|dt| dt.and_utc().timestamp())
        .map_err(|e| {
            Error::invalid_value(
                "start_date",
                format!("'{s}' does not match {START_DATE_FORMAT}: {e}"),
            )
        })
}

/// Runtime configuration for the tap
#[derive(Clone, Serialize, Deserialize)]
pub struct TapConfig {
    /// Bearer token for the Intercom API
    #[serde(default)]
    pub access_token: Option<String>,

    /// Earliest record date to sync
    #[serde(default)]
    pub start_date: Option<StartDate>,

    /// Per-stream search filters (search endpoints only)
    #[serde(default)]
    pub filters: HashMap<String, Vec<FilterPredicate>>,

    /// Override for the User-Agent header
    #[serde(default)]
    pub user_agent: Option<String>,

    /// API root, overridable for testing
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,

    /// Retries for transient HTTP failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Client-side request rate
    #[serde(default = "default_rps")]
    pub requests_per_second: u32,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    5
}

fn default_rps() -> u32 {
    10
}

impl std::fmt::Debug for TapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapConfig")
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .field("start_date", &self.start_date)
            .field("filters", &self.filters)
            .field("user_agent", &self.user_agent)
            .field("api_url", &self.api_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("requests_per_second", &self.requests_per_second)
            .finish()
    }
}

impl TapConfig {
    /// Create a config with only an access token
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            start_date: None,
            filters: HashMap::new(),
            user_agent: None,
            api_url: default_api_url(),
            request_timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            requests_per_second: default_rps(),
        }
    }

    /// Set the start date
    #[must_use]
    pub fn with_start_date(mut self, start_date: StartDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Set the API root
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Add search filters for a stream
    #[must_use]
    pub fn with_filters(mut self, stream: impl Into<String>, filters: Vec<FilterPredicate>) -> Self {
        self.filters.insert(stream.into(), filters);
        self
    }

    /// Parse and validate a JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value)
            .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Load and validate a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::config(format!("Failed to read config file: {e}")))?;
        Self::from_json_str(&content)
    }

    /// Check everything that can be checked without talking to the API
    pub fn validate(&self) -> Result<()> {
        if self.access_token.clone().none_if_empty().is_none() {
            return Err(Error::missing_field("access_token"));
        }
        if let Some(start) = &self.start_date {
            start.to_unix()?;
        }
        url::Url::parse(&self.api_url)
            .map_err(|e| Error::invalid_value("api_url", e.to_string()))?;
        for (stream, predicates) in &self.filters {
            for predicate in predicates {
                if predicate.field.is_empty() || predicate.operator.is_empty() {
                    return Err(Error::invalid_value(
                        "filters",
                        format!("filter for '{stream}' needs both field and operator"),
                    ));
                }
            }
        }
        Ok(())
    }

    /// The access token (validated to be present)
    pub fn token(&self) -> &str {
        self.access_token.as_deref().unwrap_or_default()
    }

    /// Start date normalized to unix seconds
    pub fn start_timestamp(&self) -> Result<Option<i64>> {
        self.start_date.as_ref().map(StartDate::to_unix).transpose()
    }

    /// Filters configured for a stream
    pub fn filters_for(&self, stream: &str) -> &[FilterPredicate] {
        self.filters.get(stream).map(Vec::as_slice).unwrap_or(&[])
    }

    /// JSON schema describing the accepted configuration
    pub fn json_schema() -> Value {
        json!({
            "type": "object",
            "required": ["access_token"],
            "properties": {
                "access_token": {
                    "type": "string",
                    "secret": true,
                    "description": "The key to authenticate against the API service"
                },
                "start_date": {
                    "type": ["integer", "string"],
                    "description": "The earliest record date to sync, as a unix timestamp or %Y-%m-%dT%H:%M:%SZ"
                },
                "filters": {
                    "type": "object",
                    "description": "Filters to apply to the API request (only for search endpoints)",
                    "additionalProperties": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "field": {"type": "string"},
                                "operator": {"type": "string"},
                                "value": {}
                            }
                        }
                    }
                },
                "user_agent": {
                    "type": "string",
                    "description": "Override for the User-Agent header"
                },
                "api_url": {"type": "string", "default": DEFAULT_API_URL},
                "request_timeout_secs": {"type": "integer", "default": default_timeout()},
                "max_retries": {"type": "integer", "default": default_max_retries()},
                "requests_per_second": {"type": "integer", "default": default_rps()}
            }
        })
    }
}
