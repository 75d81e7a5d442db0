//! Pagination module
//!
//! Supports: Offset cursor, JSONPath cursor, HATEOAS next link, Single object
//!
//! # Overview
//!
//! Each strategy answers two questions about a response: is there another
//! page, and what token requests it. The engine threads the token into the
//! request builder until a response ends pagination.

mod strategies;
mod types;

pub use strategies::{
    create_paginator, HateoasPaginator, JsonPathCursorPaginator, OffsetCursorPaginator,
    SinglePaginator,
};
pub use types::{NextPage, PageToken, PaginationConfig, PaginationState, Paginator};

#[cfg(test)]
mod tests;
