//! Pagination types and traits
//!
//! Defines the core pagination abstractions used by all strategies.

use crate::error::{Error, Result};
use serde_json::Value;
use tracing::warn;
use url::Url;

/// Opaque value threaded from one response into the next request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageToken {
    /// `starting_after` cursor
    Cursor(String),
    /// Full next-page URL (HATEOAS)
    Link(Url),
}

impl std::fmt::Display for PageToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageToken::Cursor(c) => write!(f, "{c}"),
            PageToken::Link(url) => write!(f, "{url}"),
        }
    }
}

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq)]
pub enum NextPage {
    /// More pages available, request the next one with this token
    Continue(PageToken),
    /// No more pages
    Done,
}

impl NextPage {
    /// Token for the next request
    pub fn token(&self) -> Option<&PageToken> {
        match self {
            Self::Continue(token) => Some(token),
            Self::Done => None,
        }
    }
}

/// Pagination strategy, selected per stream
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PaginationConfig {
    /// `pages.next.starting_after` read directly from the body
    #[default]
    OffsetCursor,

    /// Cursor extracted with a JSONPath query
    JsonPathCursor {
        /// JSONPath to the cursor (e.g. `$.pages.next.starting_after`)
        path: String,
    },

    /// `pages.next` holds the full next-page URL
    Hateoas,

    /// Single-object endpoint: one request, no token
    Single,
}

impl PaginationConfig {
    /// Create a JSONPath cursor config
    pub fn json_path_cursor(path: impl Into<String>) -> Self {
        Self::JsonPathCursor { path: path.into() }
    }
}

/// Tracks pagination state for one stream/context fetch
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Pages requested so far
    pub page: u32,
    /// Token used for the current request
    pub token: Option<PageToken>,
    /// Records seen so far
    pub total_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
        self.token = None;
    }

    /// Record the token for the following request
    pub fn set_token(&mut self, token: PageToken) {
        self.token = Some(token);
        self.page += 1;
    }

    /// Add to total fetched
    pub fn add_fetched(&mut self, count: u64) {
        self.total_fetched += count;
    }
}

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Token for the first request (always `None`)
    fn initial_token(&self) -> Option<PageToken> {
        None
    }

    /// Whether the response says another page exists
    fn has_more(&self, body: &Value) -> bool;

    /// Token for the following request
    fn next_token(&self, body: &Value) -> Result<Option<PageToken>>;

    /// Process a response and decide what comes next
    ///
    /// Fails when the API hands back the token that produced this very
    /// response, which would otherwise loop forever.
    fn process_response(
        &self,
        stream: &str,
        body: &Value,
        state: &mut PaginationState,
    ) -> Result<NextPage> {
        if !self.has_more(body) {
            state.mark_done();
            return Ok(NextPage::Done);
        }

        match self.next_token(body)? {
            None => {
                warn!(stream, "Response reports more pages but carries no token, stopping");
                state.mark_done();
                Ok(NextPage::Done)
            }
            Some(token) if state.token.as_ref() == Some(&token) => Err(Error::pagination(
                stream,
                format!("API returned the same page token twice: {token}"),
            )),
            Some(token) => {
                state.set_token(token.clone());
                Ok(NextPage::Continue(token))
            }
        }
    }
}

/// `pages.next` when present and non-null
pub(crate) fn pages_next(body: &Value) -> Option<&Value> {
    body.get("pages")
        .and_then(|pages| pages.get("next"))
        .filter(|next| !next.is_null())
}

/// Render a scalar cursor value as a string
pub(crate) fn cursor_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
