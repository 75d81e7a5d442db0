//! Request construction
//!
//! # Overview
//!
//! - GET listings: `per_page=150`, `starting_after` for cursor pages, or the
//!   query string of a next-page link
//! - POST search: `sort` ascending on the replication key, `query` composed
//!   from configured filters and the start value, `pagination` for cursor
//!   pages

mod builder;
mod types;

pub use builder::{start_value_to_unix, RequestBuilder, DEFAULT_SORT_FIELD};
pub use types::{compose_query, FilterPredicate, PreparedRequest, PAGE_SIZE};
