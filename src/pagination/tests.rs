//! Tests for pagination module

use super::*;
use crate::error::Error;
use serde_json::json;
use test_case::test_case;
use url::Url;

fn cursor(c: &str) -> PageToken {
    PageToken::Cursor(c.to_string())
}

// ============================================================================
// Offset Cursor Tests
// ============================================================================

#[test]
fn test_offset_cursor_has_next() {
    let paginator = OffsetCursorPaginator::new();
    let body = json!({"pages": {"next": {"starting_after": "abc123"}}});

    assert!(paginator.has_more(&body));
    assert_eq!(paginator.next_token(&body).unwrap(), Some(cursor("abc123")));
}

#[test_case(json!({"pages": {}}) ; "next absent")]
#[test_case(json!({"pages": {"next": null}}) ; "next null")]
#[test_case(json!({"data": []}) ; "no pages object")]
#[test_case(json!({}) ; "empty body")]
fn test_offset_cursor_terminates(body: serde_json::Value) {
    let paginator = OffsetCursorPaginator::new();
    assert!(!paginator.has_more(&body));
}

#[test]
fn test_offset_cursor_presence_not_truthiness() {
    let paginator = OffsetCursorPaginator::new();
    let body = json!({"pages": {"next": {"starting_after": 0}}});
    assert!(paginator.has_more(&body));
    assert_eq!(paginator.next_token(&body).unwrap(), Some(cursor("0")));

    let body = json!({"pages": {"next": {}}});
    assert!(paginator.has_more(&body));
    assert_eq!(paginator.next_token(&body).unwrap(), None);
}

#[test]
fn test_initial_token_is_none() {
    assert_eq!(OffsetCursorPaginator::new().initial_token(), None);
    assert_eq!(HateoasPaginator::new().initial_token(), None);
    assert_eq!(SinglePaginator::new().initial_token(), None);
}

// ============================================================================
// JSONPath Cursor Tests
// ============================================================================

#[test]
fn test_jsonpath_cursor_matches_offset_cursor() {
    let paginator = JsonPathCursorPaginator::new("$.pages.next.starting_after").unwrap();
    let body = json!({"pages": {"next": {"starting_after": "abc123"}}});

    assert!(paginator.has_more(&body));
    assert_eq!(paginator.next_token(&body).unwrap(), Some(cursor("abc123")));

    let body = json!({"pages": {"next": null}});
    assert!(!paginator.has_more(&body));
}

#[test]
fn test_jsonpath_cursor_missing_value() {
    let paginator = JsonPathCursorPaginator::new("$.pages.next.starting_after").unwrap();
    let body = json!({"pages": {"next": {"page": 2}}});
    assert_eq!(paginator.next_token(&body).unwrap(), None);
}

#[test]
fn test_jsonpath_cursor_invalid_path() {
    let err = JsonPathCursorPaginator::new("$.pages[").unwrap_err();
    assert!(matches!(err, Error::JsonPath { .. }));
}

// ============================================================================
// HATEOAS Tests
// ============================================================================

#[test]
fn test_hateoas_next_link() {
    let paginator = HateoasPaginator::new();
    let body = json!({
        "type": "list",
        "pages": {
            "type": "pages",
            "next": "https://api.intercom.io/articles?page=2&per_page=150",
            "page": 1,
            "total_pages": 3
        }
    });

    assert!(paginator.has_more(&body));
    let token = paginator.next_token(&body).unwrap().unwrap();
    let PageToken::Link(link) = &token else {
        panic!("expected a link token, got {token:?}");
    };
    assert_eq!(link.path(), "/articles");
    assert_eq!(link.query(), Some("page=2&per_page=150"));
}

#[test]
fn test_hateoas_last_page() {
    let paginator = HateoasPaginator::new();
    let body = json!({"pages": {"page": 3, "total_pages": 3, "next": null}});
    assert!(!paginator.has_more(&body));
    assert_eq!(paginator.next_token(&body).unwrap(), None);
}

#[test]
fn test_hateoas_invalid_link() {
    let paginator = HateoasPaginator::new();
    let body = json!({"pages": {"next": "not a url"}});
    assert!(matches!(
        paginator.next_token(&body).unwrap_err(),
        Error::InvalidUrl(_)
    ));
}

// ============================================================================
// Single Tests
// ============================================================================

#[test]
fn test_single_never_continues() {
    let paginator = SinglePaginator::new();
    let body = json!({"id": "1", "pages": {"next": {"starting_after": "x"}}});
    assert!(!paginator.has_more(&body));
}

// ============================================================================
// process_response Tests
// ============================================================================

#[test]
fn test_process_response_sequence_stops_at_absent_next() {
    let paginator = OffsetCursorPaginator::new();
    let mut state = PaginationState::new();
    let pages = [
        json!({"pages": {"next": {"starting_after": "a"}}}),
        json!({"pages": {"next": {"starting_after": "b"}}}),
        json!({"pages": {}}),
    ];

    let mut tokens = Vec::new();
    for body in &pages {
        match paginator.process_response("contacts", body, &mut state).unwrap() {
            NextPage::Continue(token) => tokens.push(token),
            NextPage::Done => break,
        }
    }

    assert_eq!(tokens, vec![cursor("a"), cursor("b")]);
    assert!(state.done);
    assert!(state.token.is_none());
    assert_eq!(state.page, 2);
}

#[test]
fn test_process_response_repeated_token_fails() {
    let paginator = OffsetCursorPaginator::new();
    let mut state = PaginationState::new();
    let body = json!({"pages": {"next": {"starting_after": "same"}}});

    assert!(matches!(
        paginator.process_response("conversations", &body, &mut state),
        Ok(NextPage::Continue(_))
    ));
    let err = paginator
        .process_response("conversations", &body, &mut state)
        .unwrap_err();
    assert!(matches!(err, Error::Pagination { ref stream, .. } if stream == "conversations"));
}

#[test]
fn test_process_response_has_more_without_token_stops() {
    let paginator = OffsetCursorPaginator::new();
    let mut state = PaginationState::new();
    let body = json!({"pages": {"next": {"page": 2}}});

    let next = paginator.process_response("admins", &body, &mut state).unwrap();
    assert_eq!(next, NextPage::Done);
    assert!(state.done);
}

// ============================================================================
// Factory Tests
// ============================================================================

#[test]
fn test_create_paginator() {
    let body = json!({"pages": {"next": {"starting_after": "x"}}});

    let paginator = create_paginator(&PaginationConfig::OffsetCursor).unwrap();
    assert!(paginator.has_more(&body));

    let paginator =
        create_paginator(&PaginationConfig::json_path_cursor("$.pages.next.starting_after"))
            .unwrap();
    assert_eq!(paginator.next_token(&body).unwrap(), Some(cursor("x")));

    let paginator = create_paginator(&PaginationConfig::Single).unwrap();
    assert!(!paginator.has_more(&body));

    assert_eq!(PaginationConfig::default(), PaginationConfig::OffsetCursor);
}

#[test]
fn test_page_token_display() {
    assert_eq!(cursor("abc").to_string(), "abc");
    let link = PageToken::Link(Url::parse("https://api.intercom.io/articles?page=2").unwrap());
    assert_eq!(link.to_string(), "https://api.intercom.io/articles?page=2");
}
